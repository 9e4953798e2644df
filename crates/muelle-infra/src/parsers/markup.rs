//! Markup-table parser for HTML pages and pasted table fragments
//!
//! Position based, not header aware: column 0 is the dock, then company,
//! cargo, plate, seal, arrival and departure deadline.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use muelle_domain::model::assignment::derive_id;
use muelle_domain::service::normalize::{
    non_empty, normalize_plate, normalize_seal, parse_clock_time_on,
};
use muelle_domain::{Assignment, PartialAssignmentSet};

use super::parse_dock_text;

/// Rows with fewer cells are ignored
pub const MIN_CELLS: usize = 3;

struct Patterns {
    row: Regex,
    cell: Regex,
    tag: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        row: Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("valid row regex"),
        cell: Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]\s*>").expect("valid cell regex"),
        tag: Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"),
    })
}

/// Parse table rows, anchoring clock times to today
pub fn parse_markup(html: &str) -> PartialAssignmentSet {
    parse_markup_on(html, Local::now().date_naive())
}

pub fn parse_markup_on(html: &str, today: NaiveDate) -> PartialAssignmentSet {
    let p = patterns();
    let mut out = BTreeMap::new();

    for row in p.row.captures_iter(html) {
        let Some(inner) = row.get(1) else { continue };
        let cells: Vec<String> = p
            .cell
            .captures_iter(inner.as_str())
            .filter_map(|c| c.get(1))
            .map(|c| cell_text(&p.tag, c.as_str()))
            .collect();

        if let Some(assignment) = parse_row(&cells, today) {
            out.insert(assignment.dock, assignment);
        }
    }

    out
}

fn parse_row(cells: &[String], today: NaiveDate) -> Option<Assignment> {
    if cells.len() < MIN_CELLS {
        return None;
    }
    let Some(dock) = parse_dock_text(&cells[0]) else {
        tracing::debug!(cell = %cells[0], "skipping row without a valid dock");
        return None;
    };

    let col = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
    let company = non_empty(col(1).to_string());

    Some(Assignment {
        id: derive_id(company.as_deref(), dock, col(6)),
        company,
        cargo_description: non_empty(col(2).to_string()),
        plate: normalize_plate(col(3)),
        seal: normalize_seal(col(4)),
        arrival_time: parse_clock_time_on(col(5), today),
        departure_deadline: parse_clock_time_on(col(6), today),
        dock,
        source: None,
        last_updated: None,
        notes: None,
    })
}

fn cell_text(tag: &Regex, raw: &str) -> String {
    decode_entities(&tag.replace_all(raw, ""))
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use muelle_domain::DockNumber;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn dock(n: u16) -> DockNumber {
        DockNumber::new(n).unwrap()
    }

    #[test]
    fn test_full_row() {
        let html = r#"
            <table>
              <tr><th>Muelle</th><th>Empresa</th><th>Carga</th></tr>
              <TR class="x">
                <td>320</td><td><b>Acme</b> &amp; Co</td><td>Palets</td>
                <td>ab-12 cd</td><td>s 99</td><td>08:00</td><td>14:30</td>
              </TR>
            </table>"#;
        let set = parse_markup_on(html, today());

        assert_eq!(set.len(), 1);
        let a = &set[&dock(320)];
        assert_eq!(a.company.as_deref(), Some("Acme & Co"));
        assert_eq!(a.cargo_description.as_deref(), Some("Palets"));
        assert_eq!(a.plate.as_deref(), Some("AB12CD"));
        assert_eq!(a.seal.as_deref(), Some("S99"));
        assert!(a.arrival_time.is_some());
        assert!(a.departure_deadline.is_some());
        assert_eq!(a.id, "Acme & Co-320-14:30");
    }

    #[test]
    fn test_two_cell_row_dropped() {
        let html = "<tr><td>320</td><td>Acme</td></tr>";
        assert!(parse_markup_on(html, today()).is_empty());
    }

    #[test]
    fn test_five_cell_row_has_no_times() {
        let html = "<tr><td>321</td><td>Acme</td><td>Palets</td><td>1234ABC</td><td>S1</td></tr>";
        let set = parse_markup_on(html, today());
        let a = &set[&dock(321)];
        assert_eq!(a.seal.as_deref(), Some("S1"));
        assert!(a.arrival_time.is_none());
        assert!(a.departure_deadline.is_none());
    }

    #[test]
    fn test_out_of_range_and_non_numeric_docks_dropped() {
        let html = "\
            <tr><td>999</td><td>A</td><td>B</td></tr>\
            <tr><td>&nbsp;</td><td>A</td><td>B</td></tr>\
            <tr><td> 370 </td><td>A</td><td>B</td></tr>";
        let set = parse_markup_on(html, today());
        let docks: Vec<u16> = set.keys().map(|d| d.get()).collect();
        assert_eq!(docks, vec![370]);
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        assert!(parse_markup("muelle 320 acme 14:30").is_empty());
    }
}
