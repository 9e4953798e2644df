//! Source parsers
//!
//! Each parser turns a raw payload into a [`PartialAssignmentSet`] keyed by
//! dock. Malformed entries are skipped, never reported as errors.
//!
//! [`PartialAssignmentSet`]: muelle_domain::PartialAssignmentSet

pub mod markup;
pub mod records;

pub use markup::{parse_markup, parse_markup_on};
pub use records::{parse_record_list, parse_records, parse_records_on, ParseError};

use muelle_domain::DockNumber;

/// Parse dock text such as `"320"` or `"320.0"`; anything fractional,
/// non-numeric or out of range is rejected
pub(crate) fn parse_dock_text(text: &str) -> Option<DockNumber> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let number = match text.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f: f64 = text.parse().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    DockNumber::try_from(number).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dock_text() {
        assert_eq!(parse_dock_text(" 320 ").map(DockNumber::get), Some(320));
        assert_eq!(parse_dock_text("320.0").map(DockNumber::get), Some(320));
        assert_eq!(parse_dock_text("320.5"), None);
        assert_eq!(parse_dock_text("311"), None);
        assert_eq!(parse_dock_text("Muelle"), None);
        assert_eq!(parse_dock_text(""), None);
    }
}
