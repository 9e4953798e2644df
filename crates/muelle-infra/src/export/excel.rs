//! Excel export of the dock board

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use muelle_domain::service::normalize::format_clock_time;
use muelle_domain::service::status::minutes_remaining;
use muelle_domain::service::{BoardRow, BoardSummary};
use muelle_types::{Error, Result};

/// Write `rows` classified at `now` to an xlsx workbook at `output_path`
pub fn export_board_to_excel(
    rows: &[BoardRow<'_>],
    now: DateTime<Utc>,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, rows, now)?;

    let board_sheet = workbook.add_worksheet();
    write_board_sheet(board_sheet, rows, now)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    tracing::info!(path = %output_path.display(), rows = rows.len(), "board exported");
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    rows: &[BoardRow<'_>],
    now: DateTime<Utc>,
) -> Result<()> {
    sheet
        .set_name("Resumen")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, "Control de Muelles", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    sheet
        .write_string(2, 0, "Generado:")
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_string(2, 1, now.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .map_err(|e| Error::Excel(e.to_string()))?;

    let summary = BoardSummary::from_rows(rows);
    let counts = [
        ("Muelles:", summary.total()),
        ("Libres:", summary.free),
        ("Ocupados:", summary.occupied),
        ("Alerta 30 min:", summary.warning),
        ("Retraso:", summary.late),
    ];
    for (offset, (label, count)) in counts.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, *count as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 18)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(1, 18)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_board_sheet(
    sheet: &mut Worksheet,
    rows: &[BoardRow<'_>],
    now: DateTime<Utc>,
) -> Result<()> {
    sheet
        .set_name("Muelles")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    let headers = [
        "Muelle",
        "Estado",
        "Empresa",
        "Carga",
        "Matrícula",
        "Precinto",
        "Llegada",
        "Salida",
        "Minutos",
        "Fuente",
        "Notas",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, board_row) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_number(row, 0, board_row.dock.get() as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, board_row.status.label())
            .map_err(|e| Error::Excel(e.to_string()))?;

        let Some(a) = board_row.assignment else {
            continue;
        };

        let text_cells = [
            (2, a.company.as_deref()),
            (3, a.cargo_description.as_deref()),
            (4, a.plate.as_deref()),
            (5, a.seal.as_deref()),
            (10, a.notes.as_deref()),
        ];
        for (col, value) in text_cells {
            if let Some(value) = value {
                sheet
                    .write_string(row, col, value)
                    .map_err(|e| Error::Excel(e.to_string()))?;
            }
        }

        if a.arrival_time.is_some() {
            sheet
                .write_string(row, 6, format_clock_time(a.arrival_time))
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        if a.departure_deadline.is_some() {
            sheet
                .write_string(row, 7, format_clock_time(a.departure_deadline))
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        if let Some(minutes) = minutes_remaining(a, now) {
            sheet
                .write_number(row, 8, minutes.round())
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        if let Some(source) = a.source {
            sheet
                .write_string(row, 9, source.as_str())
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
    }

    sheet
        .set_column_width(2, 24)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(3, 24)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(9, 20)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(10, 40)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}
