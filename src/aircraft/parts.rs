use hifitime::{Duration, Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    aircraft::AircraftModel,
    constants::FT_TO_M,
    situation::{AircraftSituation, AircraftSituationChange},
};

/// Provenance of [AircraftParts]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PartsDetails {
    #[default]
    NotSet,
    /// Guessed from situations
    GuessedParts,
    /// Received from the network
    FromNetwork,
}

/// Aircraft lights
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftLights {
    pub strobe: bool,
    pub landing: bool,
    pub taxi: bool,
    pub beacon: bool,
    pub nav: bool,
    pub logo: bool,
}

impl AircraftLights {
    /// Lights as a pilot would typically set them in this [AircraftSituation]
    pub fn guessed(situation: &AircraftSituation) -> Self {
        let mut lights = Self {
            nav: true,
            ..Default::default()
        };
        if situation.is_on_ground() {
            let moving = situation.is_moving();
            lights.beacon = moving;
            lights.taxi = moving && situation.ground_speed_kts < 40.0;
            lights.landing = situation.ground_speed_kts >= 40.0;
            lights.strobe = lights.landing;
        } else {
            lights.beacon = true;
            lights.strobe = true;
            lights.landing = situation
                .altitude()
                .map(|alt| alt.ft() < 10_000.0)
                .unwrap_or(false);
        }
        lights
    }
}

/// [AircraftParts] is a network delivered sub state of an aircraft,
/// updated independently of (and less frequently than) its position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftParts {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Network time offset, the adjusted [Epoch] is `epoch + time_offset`
    pub time_offset: Duration,
    /// Explicit on ground bit
    pub on_ground: bool,
    pub gear_down: bool,
    /// Flaps [%]
    pub flaps_percent: u8,
    pub spoilers_out: bool,
    pub lights: AircraftLights,
    /// Engine on/off, one per engine
    pub engines_on: Vec<bool>,
    /// [PartsDetails]
    pub details: PartsDetails,
}

impl Default for AircraftParts {
    fn default() -> Self {
        Self {
            epoch: Epoch::default(),
            time_offset: Duration::ZERO,
            on_ground: false,
            gear_down: false,
            flaps_percent: 0,
            spoilers_out: false,
            lights: AircraftLights::default(),
            engines_on: Vec::new(),
            details: PartsDetails::NotSet,
        }
    }
}

impl AircraftParts {
    /// Network [AircraftParts] with given on ground bit
    pub fn from_network(epoch: Epoch, time_offset: Duration, on_ground: bool) -> Self {
        Self {
            epoch,
            time_offset,
            on_ground,
            gear_down: on_ground,
            details: PartsDetails::FromNetwork,
            ..Default::default()
        }
    }

    /// Adjusted [Epoch]: `epoch + time_offset`
    pub fn adjusted_epoch(&self) -> Epoch {
        self.epoch + self.time_offset
    }

    pub fn engines_count(&self) -> usize {
        self.engines_on.len()
    }

    pub fn is_any_engine_on(&self) -> bool {
        self.engines_on.iter().any(|on| *on)
    }

    /// Guesses [AircraftParts] from a situation, recent trend and model.
    pub fn guessed(
        situation: &AircraftSituation,
        change: &AircraftSituationChange,
        model: &AircraftModel,
    ) -> Self {
        let engines = model.icao.engines_count().unwrap_or(2).clamp(1, 8) as usize;
        let vtol = model.is_vtol();

        let mut parts = Self {
            epoch: situation.epoch,
            time_offset: situation.time_offset,
            details: PartsDetails::GuessedParts,
            lights: AircraftLights::guessed(situation),
            ..Default::default()
        };

        if situation.is_on_ground() {
            parts.on_ground = true;
            parts.gear_down = true;
            let moving = situation.is_moving() || change.contains_pushback();
            parts.engines_on = vec![moving; engines];
            if !vtol && situation.ground_speed_kts > 40.0 {
                // takeoff or landing roll
                parts.flaps_percent = 25;
                parts.spoilers_out = change.is_just_touchdown();
            }
        } else {
            parts.engines_on = vec![true; engines];
            let height_ft = situation.height_above_ground_m().map(|h| h / FT_TO_M);
            if vtol {
                parts.gear_down = height_ft.map(|h| h < 100.0).unwrap_or(false);
            } else if let Some(height_ft) = height_ft {
                if height_ft < 300.0 || (height_ft < 1500.0 && change.is_const_descending()) {
                    parts.gear_down = true;
                    parts.flaps_percent = if height_ft < 500.0 { 100 } else { 50 };
                } else if change.is_const_descending() && situation.ground_speed_kts < 180.0 {
                    parts.flaps_percent = 25;
                }
            }
        }
        parts
    }
}
