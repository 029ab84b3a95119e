//! Handling locations and the sample location set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// United Nations location code identifying a handling location (e.g. `SESTO`).
///
/// Treated as an opaque identifier: no format checks are applied here, the
/// location repository decides which codes exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnLocode(String);

impl UnLocode {
    /// Creates a location code from any string-like value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the code is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UnLocode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnLocode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A named location where cargo can be handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub un_locode: UnLocode,
    pub name: String,
}

impl Location {
    #[must_use]
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            un_locode: UnLocode::new(code),
            name: name.to_string(),
        }
    }
}

/// Read-only lookup of known locations.
pub trait LocationRepository: Send + Sync {
    /// Returns the location for `code`, or `None` if it is unknown.
    fn find(&self, code: &UnLocode) -> Option<Location>;

    /// Returns every known location.
    fn find_all(&self) -> Vec<Location>;
}

/// Locations shipped with the service for development and testing.
pub mod samples {
    use super::Location;

    pub const SESTO: &str = "SESTO";
    pub const AUMEL: &str = "AUMEL";
    pub const CNHKG: &str = "CNHKG";
    pub const USNYC: &str = "USNYC";
    pub const USCHI: &str = "USCHI";
    pub const JNTKO: &str = "JNTKO";
    pub const DEHAM: &str = "DEHAM";
    pub const NLRTM: &str = "NLRTM";
    pub const FIHEL: &str = "FIHEL";

    /// Every sample location.
    #[must_use]
    pub fn all() -> Vec<Location> {
        vec![
            Location::new(SESTO, "Stockholm"),
            Location::new(AUMEL, "Melbourne"),
            Location::new(CNHKG, "Hongkong"),
            Location::new(USNYC, "New York"),
            Location::new(USCHI, "Chicago"),
            Location::new(JNTKO, "Tokyo"),
            Location::new(DEHAM, "Hamburg"),
            Location::new(NLRTM, "Rotterdam"),
            Location::new(FIHEL, "Helsinki"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn un_locode_displays_raw_code() {
        assert_eq!(UnLocode::from("SESTO").to_string(), "SESTO");
    }

    #[test]
    fn un_locode_serializes_as_plain_string() {
        let json = serde_json::to_string(&UnLocode::from("CNHKG")).unwrap();
        assert_eq!(json, "\"CNHKG\"");
    }

    #[test]
    fn sample_codes_are_unique() {
        let mut codes: Vec<_> = samples::all().into_iter().map(|l| l.un_locode).collect();
        let before = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), before);
    }
}
