//! Dock number type definitions

use std::fmt;
use std::str::FromStr;

use muelle_types::Error;
use serde::{Deserialize, Serialize};

/// First managed dock
pub const DOCK_MIN: u16 = 312;
/// Last managed dock (inclusive)
pub const DOCK_MAX: u16 = 370;

/// Identifier of a physical truck bay.
///
/// Construction validates the range, so a `DockNumber` outside
/// `DOCK_MIN..=DOCK_MAX` cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct DockNumber(u16);

impl DockNumber {
    pub fn new(number: u16) -> Result<Self, Error> {
        Self::try_from(i64::from(number))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Whether `number` lies in the managed range
    pub fn in_range(number: i64) -> bool {
        (i64::from(DOCK_MIN)..=i64::from(DOCK_MAX)).contains(&number)
    }

    /// Every managed dock in ascending order
    pub fn all() -> impl Iterator<Item = DockNumber> {
        (DOCK_MIN..=DOCK_MAX).map(DockNumber)
    }

    /// Total number of managed docks
    pub fn count() -> usize {
        usize::from(DOCK_MAX - DOCK_MIN) + 1
    }
}

impl TryFrom<i64> for DockNumber {
    type Error = Error;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        if Self::in_range(number) {
            // in_range bounds the value to u16
            Ok(DockNumber(number as u16))
        } else {
            Err(Error::InvalidDock(number))
        }
    }
}

impl TryFrom<u16> for DockNumber {
    type Error = Error;

    fn try_from(number: u16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(number))
    }
}

impl From<DockNumber> for u16 {
    fn from(dock: DockNumber) -> Self {
        dock.0
    }
}

impl FromStr for DockNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number: i64 = trimmed
            .parse()
            .map_err(|_| Error::Parse(format!("not a dock number: {:?}", trimmed)))?;
        Self::try_from(number)
    }
}

impl fmt::Display for DockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_inclusive() {
        assert!(DockNumber::new(DOCK_MIN).is_ok());
        assert!(DockNumber::new(DOCK_MAX).is_ok());
        assert!(DockNumber::new(DOCK_MIN - 1).is_err());
        assert!(DockNumber::new(DOCK_MAX + 1).is_err());
        assert!(DockNumber::try_from(-320_i64).is_err());
    }

    #[test]
    fn test_all_covers_range() {
        let all: Vec<_> = DockNumber::all().collect();
        assert_eq!(all.len(), DockNumber::count());
        assert_eq!(all.first().unwrap().get(), 312);
        assert_eq!(all.last().unwrap().get(), 370);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" 320 ".parse::<DockNumber>().unwrap().get(), 320);
        assert!("abc".parse::<DockNumber>().is_err());
        assert!("999".parse::<DockNumber>().is_err());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let dock: DockNumber = serde_json::from_str("330").unwrap();
        assert_eq!(dock.get(), 330);
        assert!(serde_json::from_str::<DockNumber>("100").is_err());
    }
}
