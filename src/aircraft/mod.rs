//! Aircraft identification, model and parts
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod icao;
mod model;
mod parts;

pub use icao::{AircraftIcaoCode, WakeCategory};
pub use model::AircraftModel;
pub use parts::{AircraftLights, AircraftParts, PartsDetails};

/// Unique per-flight identifier, keys all per-aircraft state.
/// Callsigns are case insensitive and stored upper case.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Callsign(String);

impl Callsign {
    pub fn new(callsign: &str) -> Self {
        Self(callsign.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Callsign {
    fn from(callsign: &str) -> Self {
        Self::new(callsign)
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Callsign;

    #[test]
    fn callsign_normalization() {
        let cs = Callsign::new(" dlh123 ");
        assert_eq!(cs.as_str(), "DLH123");
        assert_eq!(cs, Callsign::from("DLH123"));
        assert_eq!(cs.to_string(), "DLH123");
        assert!(Callsign::default().is_empty());
    }
}
