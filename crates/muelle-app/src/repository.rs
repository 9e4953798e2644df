//! Repository adapters for persistence layer

use muelle_store::SnapshotStore;
use muelle_types::Result;

use crate::config::Config;

/// Open the assignment snapshot in the configured store directory
pub fn open_store(config: &Config) -> Result<SnapshotStore> {
    let store_dir = config.store_dir()?;
    SnapshotStore::open(store_dir)
}
