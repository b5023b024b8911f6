#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ROTATE_SPEED_KTS;

/// ICAO wake turbulence category
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WakeCategory {
    Light,
    Medium,
    Heavy,
    Super,
    #[default]
    Unknown,
}

impl From<char> for WakeCategory {
    fn from(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'L' => Self::Light,
            'M' => Self::Medium,
            'H' => Self::Heavy,
            'J' => Self::Super,
            _ => Self::Unknown,
        }
    }
}

/// Aircraft ICAO type designator and description.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftIcaoCode {
    /// Type designator, like "A320"
    pub designator: String,
    /// Combined type code, like "L2J":
    /// aircraft type, number of engines, engine type
    pub combined_type: String,
    /// Wake turbulence category
    pub wtc: WakeCategory,
}

impl AircraftIcaoCode {
    pub fn new(designator: &str, combined_type: &str, wtc: WakeCategory) -> Self {
        Self {
            designator: designator.trim().to_uppercase(),
            combined_type: combined_type.trim().to_uppercase(),
            wtc,
        }
    }

    fn combined_char(&self, index: usize) -> Option<char> {
        if self.combined_type.len() != 3 {
            return None;
        }
        self.combined_type.chars().nth(index)
    }

    /// Aircraft type: L(andplane), S(eaplane), A(mphibian),
    /// H(elicopter), G(yrocopter), T(ilt rotor)
    pub fn aircraft_type(&self) -> Option<char> {
        self.combined_char(0)
    }

    pub fn engines_count(&self) -> Option<u32> {
        self.combined_char(1).and_then(|c| c.to_digit(10))
    }

    /// Engine type: J(et), T(urboprop), P(iston), E(lectric), R(ocket)
    pub fn engine_type(&self) -> Option<char> {
        self.combined_char(2)
    }

    /// Vertical take off and landing: helicopters and tilt rotors
    pub fn is_vtol(&self) -> bool {
        matches!(self.aircraft_type(), Some('H') | Some('T'))
    }

    /// Guesses CG [m] and rotate speed [kt] from the type description.
    /// Rotate speed is meaningless for VTOL aircraft but returned nonetheless.
    pub fn guess_model_parameters(&self) -> (f64, f64) {
        if self.is_vtol() {
            return (1.5, 0.0);
        }
        let engines = self.engines_count().unwrap_or(2);
        match (self.engine_type(), self.wtc) {
            (Some('J'), WakeCategory::Super) => (6.0, 160.0),
            (Some('J'), WakeCategory::Heavy) => (5.0, 150.0),
            (Some('J'), WakeCategory::Medium) => (3.0, 140.0),
            (Some('J'), _) => (1.5, 110.0),
            (Some('T'), WakeCategory::Heavy) => (3.5, 120.0),
            (Some('T'), WakeCategory::Medium) => (2.5, 110.0),
            (Some('T'), _) => (1.5, 95.0),
            (Some('P') | Some('E'), _) => {
                if engines > 1 {
                    (1.5, 80.0)
                } else {
                    (1.0, 60.0)
                }
            },
            _ => (1.5, DEFAULT_ROTATE_SPEED_KTS),
        }
    }
}
