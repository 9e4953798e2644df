//! Command handlers

use std::path::PathBuf;

use chrono::{Local, Utc};

use muelle_app::app::{self, DockSession, ImportInput, WatchOptions};
use muelle_app::config::Config;
use muelle_app::repository::open_store;
use muelle_domain::model::assignment::derive_id;
use muelle_domain::service::normalize::{normalize_plate, normalize_seal, parse_clock_time};
use muelle_domain::service::{board, BoardFilter, BoardSummary};
use muelle_domain::{Assignment, DockNumber};
use muelle_infra::export_board_to_excel;
use muelle_store::SnapshotStore;
use muelle_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::output::{output_board, output_import, output_tick};

/// Fields of a manual entry as typed on the command line
struct ManualEntry {
    id: Option<String>,
    company: Option<String>,
    cargo: Option<String>,
    plate: Option<String>,
    seal: Option<String>,
    arrival: Option<String>,
    departure: Option<String>,
    notes: Option<String>,
}

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    tracing::debug!(store_dir = ?config.store_dir, %output_format, "configuration loaded");

    match &cli.command {
        Commands::Import { input } => cmd_import(&config, input, output_format),

        Commands::Board {
            company,
            alerts_only,
        } => cmd_board(&config, build_filter(company, *alerts_only), output_format),

        Commands::Swap { from, to } => cmd_swap(&config, *from, *to),

        Commands::Assign {
            dock,
            id,
            company,
            cargo,
            plate,
            seal,
            arrival,
            departure,
            notes,
        } => {
            let entry = ManualEntry {
                id: id.clone(),
                company: company.clone(),
                cargo: cargo.clone(),
                plate: plate.clone(),
                seal: seal.clone(),
                arrival: arrival.clone(),
                departure: departure.clone(),
                notes: notes.clone(),
            };
            cmd_assign(&config, *dock, entry, output_format)
        }

        Commands::Release { dock } => cmd_release(&config, *dock),

        Commands::Clear => cmd_clear(&config),

        Commands::Watch { interval, ticks } => {
            let interval_secs = interval.unwrap_or(config.poll_interval_secs);
            cmd_watch(&config, interval_secs, *ticks, output_format)
        }

        Commands::Export {
            output,
            company,
            alerts_only,
        } => cmd_export(&config, output.clone(), build_filter(company, *alerts_only)),

        Commands::Config {
            show,
            set_store_dir,
            set_output,
            set_poll_interval,
            reset,
        } => cmd_config(
            *show,
            set_store_dir.clone(),
            *set_output,
            *set_poll_interval,
            *reset,
        ),
    }
}

fn build_filter(company: &Option<String>, alerts_only: bool) -> BoardFilter {
    let filter = BoardFilter::default().alerts_only(alerts_only);
    match company {
        Some(company) => filter.with_company(company.clone()),
        None => filter,
    }
}

/// Validate a dock typed by the user before any engine call
fn dock_arg(number: i64) -> Result<DockNumber> {
    DockNumber::try_from(number)
}

fn open_session(config: &Config) -> Result<DockSession<SnapshotStore>> {
    Ok(DockSession::open(open_store(config)?))
}

fn cmd_import(config: &Config, input: &str, output_format: OutputFormat) -> Result<()> {
    let mut session = open_session(config)?;
    let report = app::import(&mut session, &ImportInput::from_arg(input), Utc::now())?;
    output_import(output_format, &report)
}

fn cmd_board(config: &Config, filter: BoardFilter, output_format: OutputFormat) -> Result<()> {
    let session = open_session(config)?;
    let now = Utc::now();
    let rows = board(session.store(), &filter, now);
    output_board(output_format, &rows, now)
}

fn cmd_swap(config: &Config, from: i64, to: i64) -> Result<()> {
    let from = dock_arg(from)?;
    let to = dock_arg(to)?;

    let mut session = open_session(config)?;
    session.swap(from, to)?;
    println!("Swapped muelle {} <-> {}", from, to);
    Ok(())
}

fn cmd_assign(
    config: &Config,
    dock: i64,
    entry: ManualEntry,
    output_format: OutputFormat,
) -> Result<()> {
    let dock = dock_arg(dock)?;
    let assignment = build_assignment(dock, entry)?;

    let mut session = open_session(config)?;
    session.assign(assignment, Utc::now())?;

    let filter = BoardFilter::default();
    let now = Utc::now();
    let rows: Vec<_> = board(session.store(), &filter, now)
        .into_iter()
        .filter(|row| row.dock == dock)
        .collect();
    output_board(output_format, &rows, now)
}

fn parse_time_arg(text: &Option<String>) -> Result<Option<chrono::DateTime<Utc>>> {
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => parse_clock_time(t)
            .map(Some)
            .ok_or_else(|| Error::Parse(format!("invalid time '{}', expected HH:MM", t))),
    }
}

fn build_assignment(dock: DockNumber, entry: ManualEntry) -> Result<Assignment> {
    let arrival_time = parse_time_arg(&entry.arrival)?;
    let departure_deadline = parse_time_arg(&entry.departure)?;
    let company = entry.company.filter(|c| !c.trim().is_empty());

    let id = entry.id.unwrap_or_else(|| {
        derive_id(
            company.as_deref(),
            dock,
            entry.departure.as_deref().unwrap_or(""),
        )
    });

    let mut assignment = Assignment::new(dock);
    assignment.id = id;
    assignment.company = company;
    assignment.cargo_description = entry.cargo.filter(|c| !c.trim().is_empty());
    assignment.plate = entry.plate.as_deref().and_then(normalize_plate);
    assignment.seal = entry.seal.as_deref().and_then(normalize_seal);
    assignment.arrival_time = arrival_time;
    assignment.departure_deadline = departure_deadline;
    assignment.notes = entry.notes.filter(|n| !n.trim().is_empty());
    Ok(assignment)
}

fn cmd_release(config: &Config, dock: i64) -> Result<()> {
    let dock = dock_arg(dock)?;
    let mut session = open_session(config)?;

    match session.release(dock)? {
        Some(previous) => println!(
            "Released muelle {} ({})",
            dock,
            previous.company.as_deref().unwrap_or("-")
        ),
        None => println!("Muelle {} was already free", dock),
    }
    Ok(())
}

fn cmd_clear(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    let cleared = session.clear()?;
    println!("Cleared {} occupied docks", cleared);
    Ok(())
}

fn cmd_watch(
    config: &Config,
    interval_secs: u64,
    ticks: Option<u64>,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_store(config)?;
    let options = WatchOptions::new(interval_secs).with_ticks(ticks);

    if output_format == OutputFormat::Table {
        println!(
            "Watching {} every {}s (Ctrl+C to stop)",
            repo.path().display(),
            options.interval.as_secs()
        );
    }

    app::watch(&repo, &options, |tick| {
        let rows = board(&tick.store, &BoardFilter::default(), tick.now);
        output_tick(output_format, tick, BoardSummary::from_rows(&rows))
    })
}

fn cmd_export(config: &Config, output: Option<PathBuf>, filter: BoardFilter) -> Result<()> {
    let session = open_session(config)?;
    let now = Utc::now();
    let rows = board(session.store(), &filter, now);

    let output_path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "muelles-{}.xlsx",
            now.with_timezone(&Local).format("%Y%m%d-%H%M")
        ))
    });

    export_board_to_excel(&rows, now, &output_path)?;
    println!("Exported {} docks to {}", rows.len(), output_path.display());
    Ok(())
}

fn cmd_config(
    show: bool,
    set_store_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_poll_interval: Option<u64>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(store_dir) = set_store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(interval) = set_poll_interval {
        config.poll_interval_secs = interval;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ManualEntry {
        ManualEntry {
            id: None,
            company: Some("Acme".to_string()),
            cargo: Some("".to_string()),
            plate: Some("12-34 abc".to_string()),
            seal: Some("s 1".to_string()),
            arrival: None,
            departure: Some("14:30".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_dock_arg_rejects_out_of_range() {
        assert!(dock_arg(320).is_ok());
        assert!(matches!(dock_arg(400), Err(Error::InvalidDock(400))));
        assert!(matches!(dock_arg(-1), Err(Error::InvalidDock(-1))));
    }

    #[test]
    fn test_build_assignment_normalizes_fields() {
        let dock = DockNumber::new(320).unwrap();
        let a = build_assignment(dock, entry()).unwrap();
        assert_eq!(a.id, "Acme-320-14:30");
        assert_eq!(a.plate.as_deref(), Some("1234ABC"));
        assert_eq!(a.seal.as_deref(), Some("S1"));
        assert!(a.cargo_description.is_none());
        assert!(a.departure_deadline.is_some());
        assert!(a.is_verified());
    }

    #[test]
    fn test_build_assignment_rejects_bad_time() {
        let dock = DockNumber::new(320).unwrap();
        let bad = ManualEntry {
            departure: Some("later".to_string()),
            ..entry()
        };
        assert!(matches!(build_assignment(dock, bad), Err(Error::Parse(_))));
    }
}
