//! Infrastructure layer for muelle-control
//!
//! Payload parsers, the workbook and CSV spreadsheet adapter and the xlsx
//! export.

pub mod export;
pub mod parsers;
pub mod spreadsheet;

pub use export::export_board_to_excel;
pub use parsers::{parse_markup, parse_records, ParseError};
pub use spreadsheet::{
    is_spreadsheet_path, load_spreadsheet, looks_like_workbook, parse_spreadsheet_bytes,
    parse_workbook_bytes, SpreadsheetError,
};
