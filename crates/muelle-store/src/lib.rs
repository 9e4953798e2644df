//! Persistent snapshot store for dock assignments
//!
//! The whole store lives under one logical key: a single JSON file in the
//! store directory, replaced on every save.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use muelle_domain::{Assignment, AssignmentRepository, AssignmentStore, DockNumber};
use muelle_types::{Error, Result};

/// File name of the persisted snapshot
pub const SNAPSHOT_FILE: &str = "muelles-data-v1.json";

/// File-backed snapshot of the assignment store
pub struct SnapshotStore {
    store_path: PathBuf,
}

impl SnapshotStore {
    /// Open the snapshot in `store_dir`, creating the directory if needed
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(SNAPSHOT_FILE);
        Ok(Self { store_path })
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }

    fn read_snapshot(&self) -> Result<BTreeMap<DockNumber, Option<Assignment>>> {
        let file = File::open(&self.store_path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_snapshot(&self, store: &AssignmentStore) -> Result<()> {
        let tmp_path = self.store_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, store.assignments())?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.store_path)?;
        Ok(())
    }
}

impl AssignmentRepository for SnapshotStore {
    fn load(&self) -> AssignmentStore {
        if !self.store_path.exists() {
            return AssignmentStore::new();
        }

        match self.read_snapshot() {
            Ok(snapshot) => AssignmentStore::from_snapshot(snapshot),
            Err(e) => {
                tracing::warn!(
                    path = %self.store_path.display(),
                    error = %e,
                    "unreadable snapshot, starting with empty docks"
                );
                AssignmentStore::new()
            }
        }
    }

    fn save(&self, store: &AssignmentStore) -> std::result::Result<(), Error> {
        self.write_snapshot(store)?;
        tracing::debug!(
            path = %self.store_path.display(),
            occupied = store.occupied_count(),
            "snapshot saved"
        );
        Ok(())
    }
}
