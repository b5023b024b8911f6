use hifitime::Epoch;
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    aircraft::Callsign,
    constants::{
        ALLOWED_ALTITUDE_DEVIATION_FT, FT_TO_M, ROTATE_UP_PITCH_DEG, SITUATION_CHANGE_WINDOW,
    },
    situation::{AircraftSituation, IsOnGround},
};

/// Minimal number of constantly on ground samples to guess a scenery deviation
const MIN_SCENERY_DEVIATION_SAMPLES: usize = 3;

/// Population standard deviation and mean
fn std_dev_and_mean(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((var.sqrt(), mean))
}

/// [AircraftSituationChange] summarizes the trend of the latest few situations
/// of one aircraft. Recomputed each time a new situation arrives.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftSituationChange {
    /// [Callsign] of the summarized aircraft
    pub callsign: Callsign,
    /// Number of summarized situations
    pub count: usize,
    /// Adjusted [Epoch] of the latest summarized situation
    pub latest_adjusted: Option<Epoch>,
    /// Adjusted [Epoch] of the oldest summarized situation
    pub oldest_adjusted: Option<Epoch>,
    const_ascending: bool,
    const_descending: bool,
    const_on_ground: bool,
    const_not_on_ground: bool,
    just_takeoff: bool,
    just_touchdown: bool,
    rotating_up: bool,
    contains_pushback: bool,
    altitude_ft: Option<(f64, f64)>,
    elevation_ft: Option<(f64, f64)>,
    ground_distance_m: Option<(f64, f64)>,
    guessed_scenery_deviation_m: Option<f64>,
}

impl AircraftSituationChange {
    /// Builds a new [AircraftSituationChange] from situations sorted latest first.
    /// Only the most recent situations are considered, null ones are ignored.
    /// At least two situations are required, otherwise [Self::null] is returned.
    pub fn new(situations: &[AircraftSituation], cg_m: Option<f64>, is_vtol: bool) -> Self {
        let window = situations
            .iter()
            .filter(|s| !s.is_null())
            .take(SITUATION_CHANGE_WINDOW)
            .collect::<Vec<_>>();

        if window.len() < 2 {
            return Self::null();
        }

        let latest = window[0];
        let oldest = window[window.len() - 1];
        let older = &window[1..];

        let const_on_ground = window.iter().all(|s| s.is_on_ground());
        let const_not_on_ground = window
            .iter()
            .all(|s| s.on_ground() == IsOnGround::NotOnGround);

        let older_on_ground = older.iter().all(|s| s.is_on_ground());
        let older_not_on_ground = older
            .iter()
            .all(|s| s.on_ground() == IsOnGround::NotOnGround);

        let just_touchdown = latest.is_on_ground() && older_not_on_ground;
        let just_takeoff = latest.on_ground() == IsOnGround::NotOnGround && older_on_ground;

        let altitudes_ft = window
            .iter()
            .filter_map(|s| s.altitude())
            .filter(|alt| alt.is_msl())
            .map(|alt| alt.ft())
            .collect::<Vec<_>>();

        // latest first: ascending means every altitude above its predecessor
        let (const_ascending, const_descending) = if altitudes_ft.len() == window.len() {
            (
                !const_on_ground && altitudes_ft.iter().tuple_windows().all(|(new, old)| new > old),
                !const_on_ground && altitudes_ft.iter().tuple_windows().all(|(new, old)| new < old),
            )
        } else {
            (false, false)
        };

        let rotating_up = if older_on_ground && !is_vtol {
            let mean_pitch_deg =
                older.iter().map(|s| s.pitch_deg()).sum::<f64>() / older.len() as f64;
            latest.pitch_deg() - mean_pitch_deg >= ROTATE_UP_PITCH_DEG
        } else {
            false
        };

        let contains_pushback = !is_vtol && window.iter().any(|s| s.ground_speed_kts < 0.0);

        let elevations_ft = window
            .iter()
            .filter_map(|s| s.ground_elevation())
            .map(|plane| plane.elevation_ft())
            .collect::<Vec<_>>();

        let ground_distances_m = window
            .iter()
            .filter_map(|s| s.ground_distance_m(cg_m))
            .collect::<Vec<_>>();

        let guessed_scenery_deviation_m =
            if const_on_ground && ground_distances_m.len() >= MIN_SCENERY_DEVIATION_SAMPLES {
                std_dev_and_mean(&ground_distances_m).map(|(_, mean)| mean)
            } else {
                None
            };

        Self {
            callsign: latest.callsign.clone(),
            count: window.len(),
            latest_adjusted: Some(latest.adjusted_epoch()),
            oldest_adjusted: Some(oldest.adjusted_epoch()),
            const_ascending,
            const_descending,
            const_on_ground,
            const_not_on_ground,
            just_takeoff,
            just_touchdown,
            rotating_up,
            contains_pushback,
            altitude_ft: std_dev_and_mean(&altitudes_ft),
            elevation_ft: std_dev_and_mean(&elevations_ft),
            ground_distance_m: std_dev_and_mean(&ground_distances_m),
            guessed_scenery_deviation_m,
        }
    }

    /// The "no trend" [AircraftSituationChange]
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.count == 0
    }

    /// Altitude strictly increasing, never on ground
    pub fn is_const_ascending(&self) -> bool {
        self.const_ascending
    }

    /// Altitude strictly decreasing, never on ground
    pub fn is_const_descending(&self) -> bool {
        self.const_descending
    }

    pub fn is_const_on_ground(&self) -> bool {
        self.const_on_ground
    }

    pub fn is_const_not_on_ground(&self) -> bool {
        self.const_not_on_ground
    }

    pub fn is_just_takeoff(&self) -> bool {
        self.just_takeoff
    }

    pub fn is_just_touchdown(&self) -> bool {
        self.just_touchdown
    }

    /// Latest pitch noticeably above the pitch the aircraft had on ground
    pub fn is_rotating_up(&self) -> bool {
        self.rotating_up
    }

    /// At least one situation with negative ground speed
    pub fn contains_pushback(&self) -> bool {
        self.contains_pushback
    }

    /// (standard deviation, mean) of MSL altitudes [ft]
    pub fn altitude_std_dev_and_mean_ft(&self) -> Option<(f64, f64)> {
        self.altitude_ft
    }

    /// (standard deviation, mean) of known ground elevations [ft]
    pub fn elevation_std_dev_and_mean_ft(&self) -> Option<(f64, f64)> {
        self.elevation_ft
    }

    /// (standard deviation, mean) of ground distances [m], CG considered
    pub fn ground_distance_std_dev_and_mean_m(&self) -> Option<(f64, f64)> {
        self.ground_distance_m
    }

    pub fn has_altitude_dev_within_allowed_range(&self) -> bool {
        matches!(self.altitude_ft, Some((std_dev, _)) if std_dev <= ALLOWED_ALTITUDE_DEVIATION_FT)
    }

    pub fn has_elevation_dev_within_allowed_range(&self) -> bool {
        matches!(self.elevation_ft, Some((std_dev, _)) if std_dev <= ALLOWED_ALTITUDE_DEVIATION_FT)
    }

    /// Mean elevation [m], if elevations are stable
    pub fn stable_elevation_m(&self) -> Option<f64> {
        if self.has_elevation_dev_within_allowed_range() {
            self.elevation_ft.map(|(_, mean)| mean * FT_TO_M)
        } else {
            None
        }
    }

    pub fn has_scenery_deviation(&self) -> bool {
        self.guessed_scenery_deviation_m.is_some()
    }

    /// Systematic altitude offset [m] of an aircraft constantly on ground:
    /// positive when reported above our ground.
    pub fn guessed_scenery_deviation_m(&self) -> Option<f64> {
        self.guessed_scenery_deviation_m
    }
}
