//! Parsing real-looking exports from disk

use std::fs;

use chrono::{NaiveDate, Utc};
use muelle_domain::service::merge_into;
use muelle_domain::{AssignmentStore, DockNumber, Source, DOCK_MAX, DOCK_MIN};
use muelle_infra::{load_spreadsheet, parse_markup, parse_records, SpreadsheetError};
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn in_range(dock: &DockNumber) -> bool {
    (DOCK_MIN..=DOCK_MAX).contains(&dock.get())
}

#[test]
fn test_spreadsheet_file_merges_into_store() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("muelles.csv");
    fs::write(
        &path,
        "Listado de muelles;;\n\
         MUELLE;TRANSPORTISTA;SALIDA TOPE\n\
         312;Acme;10:00\n370;Beta;23:59\n400;Gamma;11:00\n",
    )
    .unwrap();

    let patch = load_spreadsheet(&path, today()).unwrap();
    let store = merge_into(&AssignmentStore::new(), &patch, Utc::now());

    assert_eq!(store.occupied_count(), 2);
    for (dock, assignment) in store.occupied() {
        assert!(in_range(&dock));
        assert_eq!(assignment.source, Some(Source::ImportExcel));
    }
}

#[test]
fn test_workbook_file_merges_into_store() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("muelles.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["MUELLE", "EMPRESA", "MATRICULA"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_number(1, 0, 320.0).unwrap();
    sheet.write_string(1, 1, "Acme").unwrap();
    sheet.write_string(1, 2, "1234 ABC").unwrap();
    sheet.write_number(2, 0, 999.0).unwrap();
    workbook.save(&path).unwrap();

    let patch = load_spreadsheet(&path, today()).unwrap();
    let store = merge_into(&AssignmentStore::new(), &patch, Utc::now());

    assert_eq!(store.occupied_count(), 1);
    let a = store.get(DockNumber::new(320).unwrap()).unwrap();
    assert_eq!(a.company.as_deref(), Some("Acme"));
    assert_eq!(a.plate.as_deref(), Some("1234ABC"));
    assert_eq!(a.source, Some(Source::ImportExcel));
}

#[test]
fn test_unreadable_workbook_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("muelles.xlsx");
    fs::write(&path, b"\x00\x01 binary junk").unwrap();

    let result = load_spreadsheet(&path, today());
    assert!(matches!(result, Err(SpreadsheetError::WorkbookError(_))));
}

#[test]
fn test_missing_spreadsheet_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = load_spreadsheet(dir.path().join("absent.csv"), today());
    assert!(matches!(result, Err(SpreadsheetError::IoError(_))));
}

#[test]
fn test_no_parser_emits_out_of_range_docks() {
    let json = r#"[
        {"muelle": 0}, {"muelle": 311}, {"muelle": 371}, {"muelle": -320}, {"muelle": 330}
    ]"#;
    let records = parse_records(json).unwrap();
    assert!(records.keys().all(in_range));
    assert_eq!(records.len(), 1);

    let html = "<tr><td>0</td><td>a</td><td>b</td></tr>\
                <tr><td>371</td><td>a</td><td>b</td></tr>";
    assert!(parse_markup(html).is_empty());
}
