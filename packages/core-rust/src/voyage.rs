//! Voyages, carrier movements and the sample voyage set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::UnLocode;

/// Identifier of a carrier voyage (e.g. `V100`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoyageNumber(String);

impl VoyageNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoyageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoyageNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

/// A single port-to-port leg sailed by a voyage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierMovement {
    pub departure_location: UnLocode,
    pub arrival_location: UnLocode,
}

/// Ordered carrier movements making up a voyage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub carrier_movements: Vec<CarrierMovement>,
}

/// A voyage with its sailing schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voyage {
    pub number: VoyageNumber,
    pub schedule: Schedule,
}

impl Voyage {
    /// Builds a voyage calling at `ports` in order.
    #[must_use]
    pub fn calling_at(number: &str, ports: &[&str]) -> Self {
        let carrier_movements = ports
            .windows(2)
            .map(|pair| CarrierMovement {
                departure_location: UnLocode::from(pair[0]),
                arrival_location: UnLocode::from(pair[1]),
            })
            .collect();

        Self {
            number: VoyageNumber::from(number),
            schedule: Schedule { carrier_movements },
        }
    }
}

/// Read-only lookup of known voyages.
pub trait VoyageRepository: Send + Sync {
    /// Returns the voyage for `number`, or `None` if it is unknown.
    fn find(&self, number: &VoyageNumber) -> Option<Voyage>;
}

/// Voyages shipped with the service for development and testing.
pub mod samples {
    use super::Voyage;
    use crate::location::samples::{AUMEL, CNHKG, DEHAM, FIHEL, JNTKO, NLRTM, SESTO, USCHI, USNYC};

    #[must_use]
    pub fn all() -> Vec<Voyage> {
        vec![
            Voyage::calling_at("V100", &[CNHKG, JNTKO, USNYC]),
            Voyage::calling_at("V300", &[JNTKO, NLRTM, DEHAM, AUMEL, JNTKO]),
            Voyage::calling_at("V400", &[DEHAM, NLRTM, FIHEL, DEHAM]),
            Voyage::calling_at("0100S", &[CNHKG, JNTKO, USNYC]),
            Voyage::calling_at("0200T", &[USNYC, USCHI]),
            Voyage::calling_at("0300A", &[USCHI, DEHAM, SESTO]),
            Voyage::calling_at("0301S", &[SESTO, FIHEL]),
            Voyage::calling_at("0400S", &[AUMEL, CNHKG, SESTO]),
        ]
    }
}
