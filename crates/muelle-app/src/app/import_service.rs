//! Import Service - turn files, directories and pasted text into patches
//!
//! Workbooks and CSV exports go through the spreadsheet adapter. Everything
//! else is treated as a payload: JSON records first, the markup-table parser
//! as fallback.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use muelle_domain::{AssignmentRepository, PartialAssignmentSet, Source};
use muelle_infra::parsers::{parse_markup_on, parse_records_on, ParseError};
use muelle_infra::spreadsheet::{
    is_spreadsheet_path, load_spreadsheet, looks_like_workbook, parse_workbook_bytes,
    SpreadsheetError,
};
use muelle_types::{Error, Result};

use super::board_service::{DockSession, MergeReport};

/// Extensions read as JSON or markup payloads
pub const PAYLOAD_EXTENSIONS: &[&str] = &["json", "html", "htm", "txt"];

/// Where an import reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportInput {
    Stdin,
    Path(PathBuf),
}

impl ImportInput {
    /// `-` means stdin
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ImportInput::Stdin
        } else {
            ImportInput::Path(PathBuf::from(arg))
        }
    }
}

/// Patch gathered from one input, before merging
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub patch: PartialAssignmentSet,
    /// Files (or `-`) that were read, in order
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub merge: MergeReport,
}

/// Parse pasted or fetched text: JSON records, else markup table rows.
///
/// Entries without a source tag are tagged `import-json-or-html`.
pub fn parse_payload(text: &str, today: NaiveDate) -> PartialAssignmentSet {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let records = serde_json::from_str::<Value>(text)
        .map_err(ParseError::from)
        .and_then(|value| parse_records_on(&value, today));

    let mut set = match records {
        Ok(set) => set,
        Err(e) => {
            tracing::debug!(error = %e, "not a record payload, trying markup table");
            parse_markup_on(text, today)
        }
    };
    for assignment in set.values_mut() {
        assignment.source.get_or_insert(Source::ImportJsonOrHtml);
    }
    set
}

fn is_importable(path: &Path) -> bool {
    is_spreadsheet_path(path)
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PAYLOAD_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn spreadsheet_error(path: &Path, e: SpreadsheetError) -> Error {
    Error::Spreadsheet(format!("{}: {}", path.display(), e))
}

/// Read a single file.
///
/// Workbooks and CSV exports are picked by extension. Other files are read
/// as payloads, unless their bytes reveal a workbook container.
pub fn read_file(path: &Path, today: NaiveDate) -> Result<PartialAssignmentSet> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if is_spreadsheet_path(path) {
        return load_spreadsheet(path, today).map_err(|e| spreadsheet_error(path, e));
    }

    let bytes = std::fs::read(path)?;
    if looks_like_workbook(&bytes) {
        tracing::debug!(file = %path.display(), "payload is a workbook container");
        return parse_workbook_bytes(&bytes, today).map_err(|e| spreadsheet_error(path, e));
    }

    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_payload(&text, today))
}

/// Every importable file under `dir`, sorted by name
pub fn find_import_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_importable(path))
        .collect()
}

/// Gather a patch from `input`; later files win for the same dock
pub fn collect_patch(input: &ImportInput, today: NaiveDate) -> Result<ImportBatch> {
    let mut batch = ImportBatch::default();

    match input {
        ImportInput::Stdin => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            batch.patch = parse_payload(&text, today);
            batch.sources.push("-".to_string());
        }
        ImportInput::Path(path) if path.is_dir() => {
            for file in find_import_files(path) {
                let patch = read_file(&file, today)?;
                tracing::debug!(file = %file.display(), entries = patch.len(), "read import file");
                batch.patch.extend(patch);
                batch.sources.push(file.display().to_string());
            }
        }
        ImportInput::Path(path) => {
            batch.patch = read_file(path, today)?;
            batch.sources.push(path.display().to_string());
        }
    }

    Ok(batch)
}

/// Read `input` and merge it into the session's board
pub fn import<R: AssignmentRepository>(
    session: &mut DockSession<R>,
    input: &ImportInput,
    now: DateTime<Utc>,
) -> Result<ImportReport> {
    let today = now.with_timezone(&Local).date_naive();
    let batch = collect_patch(input, today)?;
    if batch.patch.is_empty() {
        tracing::warn!(sources = batch.sources.len(), "no dock entries recognized");
    }

    let merge = session.apply_patch(&batch.patch, now)?;
    Ok(ImportReport {
        sources: batch.sources,
        merge,
    })
}
