//! Report export

pub mod excel;

pub use excel::export_board_to_excel;
