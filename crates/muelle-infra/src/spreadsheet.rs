//! Loader for dock sheets: xlsx/xls/ods workbooks and their CSV exports
//!
//! CSV exports may be UTF-8 or Windows-1252 encoded, separated by commas,
//! semicolons or tabs. Both kinds may carry title rows above the `MUELLE`
//! header.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use serde_json::{Map, Value};
use thiserror::Error;

use muelle_domain::{PartialAssignmentSet, Source};

use crate::parsers::parse_record_list;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

/// Workbook formats read cell by cell
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];
/// Text exports of a dock sheet
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Header cell marking the header row
pub const HEADER_MARKER: &str = "MUELLE";

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to read workbook: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("Spreadsheet has no rows")]
    Empty,
}

/// Whether `path` names a workbook or CSV export
pub fn is_spreadsheet_path(path: &Path) -> bool {
    has_extension(path, WORKBOOK_EXTENSIONS) || has_extension(path, CSV_EXTENSIONS)
}

/// Whether `bytes` start like a zip (xlsx/ods) or OLE (xls) container
pub fn looks_like_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Load assignments from a workbook or CSV export, anchoring clock times
/// to `today`
pub fn load_spreadsheet<P: AsRef<Path>>(
    path: P,
    today: NaiveDate,
) -> Result<PartialAssignmentSet, SpreadsheetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    if has_extension(path, WORKBOOK_EXTENSIONS) || looks_like_workbook(&bytes) {
        parse_workbook_bytes(&bytes, today)
    } else {
        parse_spreadsheet_bytes(&bytes, today)
    }
}

/// Parse the first sheet of an xlsx, xls or ods workbook
pub fn parse_workbook_bytes(
    bytes: &[u8],
    today: NaiveDate,
) -> Result<PartialAssignmentSet, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::Empty)??;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    if rows.is_empty() {
        return Err(SpreadsheetError::Empty);
    }

    tracing::debug!(rows = rows.len(), "decoded workbook");
    Ok(tag_excel(parse_record_list(&rows_to_records(&rows), today)))
}

/// Cell as the text a user would see; time cells become `HH:MM`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => {
            let minutes = (dt.as_f64().fract() * 1440.0).round() as i64 % 1440;
            format!("{:02}:{:02}", minutes / 60, minutes % 60)
        }
        _ => String::new(),
    }
}

/// Decode and parse raw CSV bytes; every entry is tagged `import-excel`
pub fn parse_spreadsheet_bytes(
    bytes: &[u8],
    today: NaiveDate,
) -> Result<PartialAssignmentSet, SpreadsheetError> {
    let text = decode(bytes);
    let delimiter = detect_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        rows.push(result?.iter().map(str::to_string).collect());
    }
    if rows.is_empty() {
        return Err(SpreadsheetError::Empty);
    }

    tracing::debug!(
        rows = rows.len(),
        delimiter = %(delimiter as char).escape_default(),
        "decoded spreadsheet"
    );
    Ok(tag_excel(parse_record_list(&rows_to_records(&rows), today)))
}

fn tag_excel(mut set: PartialAssignmentSet) -> PartialAssignmentSet {
    for assignment in set.values_mut() {
        assignment.source.get_or_insert(Source::ImportExcel);
    }
    set
}

/// Header-keyed records below the first row holding the `MUELLE` marker
fn rows_to_records(rows: &[Vec<String>]) -> Vec<Value> {
    let header_idx = rows
        .iter()
        .position(|row| row.iter().any(|cell| is_header_marker(cell)))
        .unwrap_or(0);
    let headers: Vec<String> = rows[header_idx]
        .iter()
        .map(|cell| {
            if is_header_marker(cell) {
                HEADER_MARKER.to_string()
            } else {
                cell.trim().to_string()
            }
        })
        .collect();

    rows[header_idx + 1..]
        .iter()
        .map(|row| {
            let mut record = Map::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                if header.is_empty() || record.contains_key(header) {
                    continue;
                }
                record.insert(header.clone(), Value::String(cell.clone()));
            }
            Value::Object(record)
        })
        .collect()
}

fn is_header_marker(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(HEADER_MARKER)
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                tracing::warn!("some characters could not be decoded from Windows-1252");
            }
            decoded
        }
    }
}

/// Most frequent of `;`, tab and `,` over the first lines; comma on ties
fn detect_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text.lines().take(10).collect();
    let count = |c: char| sample.iter().map(|l| l.matches(c).count()).sum::<usize>();

    let mut best = (b',', count(','));
    for candidate in [b';', b'\t'] {
        let n = count(candidate as char);
        if n > best.1 {
            best = (candidate, n);
        }
    }
    best.0
}
