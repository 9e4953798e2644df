//! Assignment-related type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dock::DockNumber;

/// Provenance of an assignment: which ingestion path last touched it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Imported without a more specific tag
    #[serde(rename = "import")]
    Import,
    /// Spreadsheet export
    #[serde(rename = "import-excel", alias = "excel")]
    ImportExcel,
    /// JSON records or an HTML table (remote payload or paste)
    #[serde(rename = "import-json-or-html")]
    ImportJsonOrHtml,
    /// Reconciled into an already occupied dock
    #[serde(rename = "merged", alias = "merge")]
    Merged,
    /// Entered by an operator
    #[serde(rename = "manual")]
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Import => "import",
            Source::ImportExcel => "import-excel",
            Source::ImportJsonOrHtml => "import-json-or-html",
            Source::Merged => "merged",
            Source::Manual => "manual",
        }
    }

    /// Parse a tag as written in payloads, accepting legacy spellings
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "import" => Some(Source::Import),
            "import-excel" | "excel" => Some(Source::ImportExcel),
            "import-json-or-html" | "json" | "html" => Some(Source::ImportJsonOrHtml),
            "merged" | "merge" => Some(Source::Merged),
            "manual" => Some(Source::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The truck currently occupying a dock.
///
/// Aliases accept the field names of snapshots written by the old
/// browser dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Display label; identity is the dock number
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "empresa")]
    pub company: Option<String>,

    #[serde(default, alias = "carga")]
    pub cargo_description: Option<String>,

    /// Vehicle registration, uppercase alphanumeric
    #[serde(default, alias = "matricula")]
    pub plate: Option<String>,

    /// Security seal code
    #[serde(default, alias = "precinto")]
    pub seal: Option<String>,

    #[serde(default, alias = "horaLlegada")]
    pub arrival_time: Option<DateTime<Utc>>,

    /// Drives status classification and departure alerts
    #[serde(default, alias = "horaSalidaLimite")]
    pub departure_deadline: Option<DateTime<Utc>>,

    /// Always equal to the key the assignment is stored under
    #[serde(alias = "muelle")]
    pub dock: DockNumber,

    /// None only on freshly parsed entries
    #[serde(default, alias = "fuente")]
    pub source: Option<Source>,

    #[serde(default, alias = "actualizadoEn")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default, alias = "notas")]
    pub notes: Option<String>,
}

impl Assignment {
    /// Empty assignment for `dock`, id derived from the dock alone
    pub fn new(dock: DockNumber) -> Self {
        Self {
            id: derive_id(None, dock, ""),
            company: None,
            cargo_description: None,
            plate: None,
            seal: None,
            arrival_time: None,
            departure_deadline: None,
            dock,
            source: None,
            last_updated: None,
            notes: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.plate = Some(plate.into());
        self
    }

    pub fn with_departure_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.departure_deadline = Some(deadline);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Plate and seal have both been recorded
    pub fn is_verified(&self) -> bool {
        self.plate.is_some() && self.seal.is_some()
    }
}

/// Best-effort label built from company, dock and the raw departure text
pub fn derive_id(company: Option<&str>, dock: DockNumber, raw_departure: &str) -> String {
    format!("{}-{}-{}", company.unwrap_or(""), dock, raw_departure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dock(n: u16) -> DockNumber {
        DockNumber::new(n).unwrap()
    }

    #[test]
    fn test_derive_id() {
        assert_eq!(derive_id(Some("Acme"), dock(320), "14:30"), "Acme-320-14:30");
        assert_eq!(derive_id(None, dock(312), ""), "-312-");
    }

    #[test]
    fn test_source_serde_tags() {
        let json = serde_json::to_string(&Source::ImportJsonOrHtml).unwrap();
        assert_eq!(json, "\"import-json-or-html\"");
        let legacy: Source = serde_json::from_str("\"merge\"").unwrap();
        assert_eq!(legacy, Source::Merged);
        let legacy: Source = serde_json::from_str("\"excel\"").unwrap();
        assert_eq!(legacy, Source::ImportExcel);
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(Source::parse(" Manual "), Some(Source::Manual));
        assert_eq!(Source::parse("unknown"), None);
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let legacy = r#"{
            "id": "x",
            "empresa": "Acme",
            "carga": "Palets",
            "matricula": "1234ABC",
            "horaSalidaLimite": "2024-05-01T12:30:00.000Z",
            "muelle": 320,
            "fuente": "excel"
        }"#;
        let a: Assignment = serde_json::from_str(legacy).unwrap();
        assert_eq!(a.company.as_deref(), Some("Acme"));
        assert_eq!(a.cargo_description.as_deref(), Some("Palets"));
        assert_eq!(a.dock.get(), 320);
        assert_eq!(a.source, Some(Source::ImportExcel));
        assert!(a.departure_deadline.is_some());
        assert!(!a.is_verified());
    }
}
