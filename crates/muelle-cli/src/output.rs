//! Output formatting module

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use muelle_app::app::{ImportReport, WatchTick};
use muelle_domain::service::normalize::format_clock_time;
use muelle_domain::service::status::minutes_remaining;
use muelle_domain::service::{BoardRow, BoardSummary, DepartureAlert, DockStatus};
use muelle_domain::{Assignment, DockNumber};
use muelle_types::{OutputFormat, Result};

#[derive(Serialize)]
struct BoardRowView<'a> {
    dock: DockNumber,
    status: DockStatus,
    label: &'static str,
    minutes_remaining: Option<f64>,
    assignment: Option<&'a Assignment>,
}

#[derive(Serialize)]
struct BoardView<'a> {
    generated_at: DateTime<Utc>,
    summary: BoardSummary,
    docks: Vec<BoardRowView<'a>>,
}

/// Truncate to `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn output_board(
    output_format: OutputFormat,
    rows: &[BoardRow<'_>],
    now: DateTime<Utc>,
) -> Result<()> {
    let summary = BoardSummary::from_rows(rows);

    if output_format == OutputFormat::Json {
        let view = BoardView {
            generated_at: now,
            summary,
            docks: rows
                .iter()
                .map(|row| BoardRowView {
                    dock: row.dock,
                    status: row.status,
                    label: row.status.label(),
                    minutes_remaining: row.assignment.and_then(|a| minutes_remaining(a, now)),
                    assignment: row.assignment,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Dock Board ({})", now.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    println!("==========");

    if rows.is_empty() {
        println!("No docks match the filter.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<20} {:<16} {:<10} {:<10} {:>7} {:>7} {:>6}",
        "Muelle",
        "Estado",
        "Empresa",
        "Carga",
        "Matrícula",
        "Precinto",
        "Llegada",
        "Salida",
        "Min."
    );
    println!("{}", "-".repeat(102));

    for row in rows {
        let status = format!("{} {}", row.status.icon(), row.status.label());
        match row.assignment {
            None => println!("{:<6} {:<12}", row.dock, status),
            Some(a) => {
                let minutes = minutes_remaining(a, now)
                    .map(|m| format!("{:.0}", m))
                    .unwrap_or_else(|| "-".to_string());
                let plate = if a.is_verified() {
                    format!("{} ✓", or_dash(a.plate.as_deref()))
                } else {
                    or_dash(a.plate.as_deref()).to_string()
                };
                println!(
                    "{:<6} {:<12} {:<20} {:<16} {:<10} {:<10} {:>7} {:>7} {:>6}",
                    row.dock,
                    status,
                    truncate(or_dash(a.company.as_deref()), 20),
                    truncate(or_dash(a.cargo_description.as_deref()), 16),
                    truncate(&plate, 10),
                    truncate(or_dash(a.seal.as_deref()), 10),
                    format_clock_time(a.arrival_time),
                    format_clock_time(a.departure_deadline),
                    minutes,
                );
            }
        }
    }

    println!();
    println!(
        "Free: {}  Occupied: {}  Warning: {}  Late: {}  (of {})",
        summary.free,
        summary.occupied,
        summary.warning,
        summary.late,
        summary.total()
    );

    Ok(())
}

pub fn output_import(output_format: OutputFormat, report: &ImportReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Import Result");
    println!("=============");
    println!("Sources read:    {}", report.sources.len());
    for source in &report.sources {
        println!("  {}", source);
    }
    if report.merge.recognized == 0 {
        println!("No dock entries recognized.");
        return Ok(());
    }
    println!("Recognized:      {}", report.merge.recognized);
    println!("New docks:       {}", report.merge.inserted);
    println!("Merged:          {}", report.merge.merged);

    Ok(())
}

pub fn format_alert(alert: &DepartureAlert) -> String {
    format!(
        "🔔 {} ({}) {}",
        alert.title(),
        format_clock_time(Some(alert.deadline)),
        alert.body()
    )
}

#[derive(Serialize)]
struct TickView<'a> {
    tick: u64,
    now: DateTime<Utc>,
    summary: BoardSummary,
    alerts: &'a [DepartureAlert],
}

/// One watch poll: a status line plus any new alerts
pub fn output_tick(
    output_format: OutputFormat,
    tick: &WatchTick,
    summary: BoardSummary,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let view = TickView {
            tick: tick.tick,
            now: tick.now,
            summary,
            alerts: &tick.alerts,
        };
        println!("{}", serde_json::to_string(&view)?);
        return Ok(());
    }

    println!(
        "[{}] occupied {}  warning {}  late {}",
        tick.now.with_timezone(&Local).format("%H:%M:%S"),
        summary.occupied + summary.warning + summary.late,
        summary.warning,
        summary.late
    );
    for alert in &tick.alerts {
        println!("  {}", format_alert(alert));
    }

    Ok(())
}
