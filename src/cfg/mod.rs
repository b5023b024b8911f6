#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::TIME_DEVIATION_FACTOR;

mod mode;
pub use mode::InterpolatorMode;

fn default_mode() -> InterpolatorMode {
    InterpolatorMode::Linear
}

fn default_fix_scenery_offset() -> bool {
    false
}

fn default_pitch_on_ground() -> Option<f64> {
    None
}

fn default_log_interpolation() -> bool {
    false
}

fn default_aircraft_parts() -> bool {
    true
}

fn default_parts_interpolation_ratio() -> u32 {
    2
}

fn default_parts_guessing_ratio() -> u32 {
    5
}

fn default_cg_refresh_ratio() -> u32 {
    25
}

fn default_time_deviation_factor() -> f64 {
    TIME_DEVIATION_FACTOR
}

/// Interpolation setup of one aircraft.
/// A modified setup invalidates the interpolator's cached situations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterpolationSetup {
    /// [InterpolatorMode]
    #[cfg_attr(feature = "serde", serde(default = "default_mode"))]
    pub mode: InterpolatorMode,

    /// Compensate the systematic altitude bias between the
    /// remote and the local scenery.
    #[cfg_attr(feature = "serde", serde(default = "default_fix_scenery_offset"))]
    pub fix_scenery_offset: bool,

    /// Forced pitch [deg] for aircraft on ground
    #[cfg_attr(feature = "serde", serde(default = "default_pitch_on_ground"))]
    pub pitch_on_ground_deg: Option<f64>,

    /// Produce [crate::prelude::SituationLog] and [crate::prelude::PartsLog] records
    #[cfg_attr(feature = "serde", serde(default = "default_log_interpolation"))]
    pub log_interpolation: bool,

    /// Use (or guess) aircraft parts
    #[cfg_attr(feature = "serde", serde(default = "default_aircraft_parts"))]
    pub aircraft_parts_enabled: bool,

    /// Parts are interpolated every n-th call. Valid range is 1..=10.
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_parts_interpolation_ratio")
    )]
    pub parts_interpolation_ratio: u32,

    /// Parts are guessed every n-th parts interpolation, when the network does not provide them
    #[cfg_attr(feature = "serde", serde(default = "default_parts_guessing_ratio"))]
    pub parts_guessing_ratio: u32,

    /// CG is refreshed every n-th call
    #[cfg_attr(feature = "serde", serde(default = "default_cg_refresh_ratio"))]
    pub cg_refresh_ratio: u32,

    /// Future parts are accepted within this fraction of their time offset
    #[cfg_attr(feature = "serde", serde(default = "default_time_deviation_factor"))]
    pub time_deviation_factor: f64,
}

impl Default for InterpolationSetup {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            fix_scenery_offset: default_fix_scenery_offset(),
            pitch_on_ground_deg: default_pitch_on_ground(),
            log_interpolation: default_log_interpolation(),
            aircraft_parts_enabled: default_aircraft_parts(),
            parts_interpolation_ratio: default_parts_interpolation_ratio(),
            parts_guessing_ratio: default_parts_guessing_ratio(),
            cg_refresh_ratio: default_cg_refresh_ratio(),
            time_deviation_factor: default_time_deviation_factor(),
        }
    }
}

impl InterpolationSetup {
    /// Copies and returns [Self] with given [InterpolatorMode]
    pub fn with_mode(&self, mode: InterpolatorMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }

    /// Copies and returns [Self] with given pitch on ground [deg]
    pub fn with_pitch_on_ground_deg(&self, pitch_deg: Option<f64>) -> Self {
        let mut s = self.clone();
        s.pitch_on_ground_deg = pitch_deg;
        s
    }

    /// Copies and returns [Self] with scenery offset compensation
    pub fn with_scenery_offset_fix(&self, fix: bool) -> Self {
        let mut s = self.clone();
        s.fix_scenery_offset = fix;
        s
    }

    /// Copies and returns [Self] with interpolation logging
    pub fn with_logging(&self, log: bool) -> Self {
        let mut s = self.clone();
        s.log_interpolation = log;
        s
    }

    /// Copies and returns [Self] with aircraft parts enabled or disabled
    pub fn with_aircraft_parts(&self, enabled: bool) -> Self {
        let mut s = self.clone();
        s.aircraft_parts_enabled = enabled;
        s
    }

    /// Parts interpolation ratio, within its valid range
    pub(crate) fn parts_interpolation_ratio(&self) -> u32 {
        self.parts_interpolation_ratio.clamp(1, 10)
    }

    pub(crate) fn parts_guessing_ratio(&self) -> u32 {
        self.parts_guessing_ratio.max(1)
    }

    pub(crate) fn cg_refresh_ratio(&self) -> u32 {
        self.cg_refresh_ratio.max(1)
    }
}
