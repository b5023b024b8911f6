#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aircraft::{AircraftIcaoCode, Callsign};

/// Rendered model of a remote aircraft, as resolved by model matching.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftModel {
    /// Aircraft this model is used for
    pub callsign: Callsign,
    /// Simulator model string
    pub model_string: String,
    /// [AircraftIcaoCode]
    pub icao: AircraftIcaoCode,
    /// CG [m] as defined by the simulator model, when known
    pub cg_m: Option<f64>,
}

impl AircraftModel {
    pub fn new(callsign: Callsign, model_string: &str, icao: AircraftIcaoCode) -> Self {
        Self {
            callsign,
            model_string: model_string.to_string(),
            icao,
            cg_m: None,
        }
    }

    /// Copies and returns [Self] with given CG [m]
    pub fn with_cg_m(&self, cg_m: f64) -> Self {
        let mut s = self.clone();
        s.cg_m = Some(cg_m);
        s
    }

    pub fn has_model_cg(&self) -> bool {
        self.cg_m.is_some()
    }

    /// CG [m] of this model, guessed from the ICAO code if not provided
    pub fn cg_or_guessed_m(&self) -> f64 {
        self.cg_m
            .unwrap_or_else(|| self.icao.guess_model_parameters().0)
    }

    /// Rotate speed [kt] guessed from the ICAO code
    pub fn guessed_rotate_speed_kts(&self) -> f64 {
        self.icao.guess_model_parameters().1
    }

    pub fn is_vtol(&self) -> bool {
        self.icao.is_vtol()
    }
}

#[cfg(test)]
mod test {
    use super::AircraftModel;
    use crate::aircraft::{AircraftIcaoCode, Callsign, WakeCategory};

    #[test]
    fn model_cg() {
        let icao = AircraftIcaoCode::new("B738", "L2J", WakeCategory::Medium);
        let model = AircraftModel::new(Callsign::new("RYR1"), "B737-800 RYR", icao);
        assert!(!model.has_model_cg());
        assert_eq!(model.cg_or_guessed_m(), 3.0);
        assert_eq!(model.guessed_rotate_speed_kts(), 140.0);

        let model = model.with_cg_m(2.2);
        assert!(model.has_model_cg());
        assert_eq!(model.cg_or_guessed_m(), 2.2);
        assert!(!model.is_vtol());
    }
}
