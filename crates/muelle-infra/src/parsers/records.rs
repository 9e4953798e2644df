//! Structured-record parser for JSON payloads and decoded spreadsheet rows

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

use muelle_domain::model::assignment::derive_id;
use muelle_domain::service::normalize::{
    non_empty, normalize_plate, normalize_seal, normalize_text, parse_clock_time_on,
};
use muelle_domain::{Assignment, DockNumber, PartialAssignmentSet, Source};

use super::parse_dock_text;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Payload is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("Expected an array of records or an object with an `items` array")]
    UnexpectedShape,
}

/// Wrapper field holding the record list
pub const ITEMS_KEY: &str = "items";

// Accepted key spellings per field, tried in order.
const DOCK_KEYS: &[&str] = &["muelle", "MUELLE", "Muelle"];
const ID_KEYS: &[&str] = &["id", "ID", "booking", "CMR"];
const COMPANY_KEYS: &[&str] = &["empresa", "EMPRESA", "Empresa", "TRANSPORTISTA"];
const CARGO_KEYS: &[&str] = &["carga", "CARGA", "Carga", "DESTINO"];
const PLATE_KEYS: &[&str] = &["matricula", "MATRICULA", "Matricula", "Matrícula"];
const SEAL_KEYS: &[&str] = &["precinto", "PRECINTO", "Precinto"];
const ARRIVAL_KEYS: &[&str] = &["llegada", "LLEGADA", "Llegada", "Hora llegada", "LLEGADA HH:MM"];
const DEPARTURE_KEYS: &[&str] = &[
    "salida",
    "SALIDA TOPE",
    "SALIDA",
    "Salida",
    "Hora límite",
    "SALIDA HH:MM",
];
const NOTES_KEYS: &[&str] = &["notas", "NOTAS", "notes", "observaciones", "OBSERVACIONES"];
const SOURCE_KEYS: &[&str] = &["fuente", "source"];

/// Parse a JSON payload, anchoring clock times to today
pub fn parse_records(text: &str) -> Result<PartialAssignmentSet, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    parse_records_on(&value, Local::now().date_naive())
}

/// Parse an already decoded payload: either an array of records or an
/// object with an `items` array
pub fn parse_records_on(
    value: &Value,
    today: NaiveDate,
) -> Result<PartialAssignmentSet, ParseError> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(wrapper) => match wrapper.get(ITEMS_KEY) {
            Some(Value::Array(items)) => items,
            _ => return Err(ParseError::UnexpectedShape),
        },
        _ => return Err(ParseError::UnexpectedShape),
    };
    Ok(parse_record_list(list, today))
}

/// Parse a list of records; later records for the same dock win
pub fn parse_record_list(list: &[Value], today: NaiveDate) -> PartialAssignmentSet {
    let mut out = BTreeMap::new();
    for (idx, item) in list.iter().enumerate() {
        let Some(record) = item.as_object() else {
            tracing::debug!(index = idx, "skipping non-object record");
            continue;
        };
        match parse_record(record, today) {
            Some(assignment) => {
                out.insert(assignment.dock, assignment);
            }
            None => tracing::debug!(index = idx, "skipping record without a valid dock"),
        }
    }
    out
}

fn parse_record(record: &Map<String, Value>, today: NaiveDate) -> Option<Assignment> {
    let dock = lookup(record, DOCK_KEYS).and_then(dock_of)?;

    let company = non_empty(lookup_text(record, COMPANY_KEYS));
    let raw_departure = lookup_text(record, DEPARTURE_KEYS);
    let id = non_empty(lookup_text(record, ID_KEYS))
        .unwrap_or_else(|| derive_id(company.as_deref(), dock, &raw_departure));

    Some(Assignment {
        id,
        company,
        cargo_description: non_empty(lookup_text(record, CARGO_KEYS)),
        plate: normalize_plate(&lookup_text(record, PLATE_KEYS)),
        seal: normalize_seal(&lookup_text(record, SEAL_KEYS)),
        arrival_time: parse_clock_time_on(&lookup_text(record, ARRIVAL_KEYS), today),
        departure_deadline: parse_clock_time_on(&raw_departure, today),
        dock,
        source: Source::parse(&lookup_text(record, SOURCE_KEYS)),
        last_updated: None,
        notes: non_empty(lookup_text(record, NOTES_KEYS)),
    })
}

/// First alias holding a non-empty value
fn lookup<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !normalize_text(value).is_empty())
}

fn lookup_text(record: &Map<String, Value>, aliases: &[&str]) -> String {
    lookup(record, aliases).map(normalize_text).unwrap_or_default()
}

fn dock_of(value: &Value) -> Option<DockNumber> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => DockNumber::try_from(i).ok(),
            None => parse_dock_text(&n.to_string()),
        },
        Value::String(s) => parse_dock_text(s),
        _ => None,
    }
}
