use hifitime::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    aircraft::AircraftParts,
    constants::{CG_NEAR_GROUND_FACTOR, DELTA_NEAR_GROUND_M, GROUND_FACTOR_EPSILON},
    situation::AircraftSituation,
};

/// On ground tri-state
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IsOnGround {
    NotOnGround,
    OnGround,
    #[default]
    Unknown,
}

impl std::fmt::Display for IsOnGround {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotOnGround => write!(f, "not on ground"),
            Self::OnGround => write!(f, "on ground"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Provenance of the on ground information
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnGroundDetails {
    #[default]
    NotSet,
    /// Interpolated between two situations with ground details
    ByInterpolation,
    /// Ground elevation and altitude
    ByElevation,
    /// Ground elevation, CG and altitude
    ByElevationAndCG,
    /// Heuristics
    ByGuessing,
    /// Explicit flag received from the network
    InFromNetwork,
    /// Derived from [AircraftParts]
    InFromParts,
    /// Own aircraft, reported by the simulator
    OutOnGroundOwnAircraft,
}

impl std::fmt::Display for OnGroundDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotSet => write!(f, "not set"),
            Self::ByInterpolation => write!(f, "by interpolation"),
            Self::ByElevation => write!(f, "by elevation"),
            Self::ByElevationAndCG => write!(f, "by elevation and CG"),
            Self::ByGuessing => write!(f, "by guessing"),
            Self::InFromNetwork => write!(f, "from network"),
            Self::InFromParts => write!(f, "from parts"),
            Self::OutOnGroundOwnAircraft => write!(f, "own aircraft"),
        }
    }
}

impl AircraftSituation {
    pub fn on_ground(&self) -> IsOnGround {
        self.on_ground
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground == IsOnGround::OnGround
    }

    pub fn on_ground_details(&self) -> OnGroundDetails {
        self.on_ground_details
    }

    /// Ground factor within [0, 1], or -1 when unknown
    pub fn on_ground_factor(&self) -> f64 {
        self.on_ground_factor
    }

    /// Free text explaining the latest guess, only populated in debug builds
    pub fn on_ground_guessing_details(&self) -> &str {
        &self.on_ground_guessing_details
    }

    /// Updates on ground flag and its provenance.
    /// The ground factor follows the flag.
    pub fn set_on_ground(&mut self, on_ground: IsOnGround, details: OnGroundDetails) {
        self.on_ground = on_ground;
        self.on_ground_details = details;
        self.on_ground_factor = match on_ground {
            IsOnGround::OnGround => 1.0,
            IsOnGround::NotOnGround => 0.0,
            IsOnGround::Unknown => -1.0,
        };
    }

    pub fn set_on_ground_details(&mut self, details: OnGroundDetails) {
        self.on_ground_details = details;
    }

    /// Sets the ground factor. Negative values mean "unknown" (-1),
    /// others are clamped to [0, 1] and snapped to 0 or 1 within a small epsilon.
    pub fn set_on_ground_factor(&mut self, factor: f64) {
        self.on_ground_factor = if factor.is_nan() || factor < 0.0 {
            -1.0
        } else if factor > 1.0 - GROUND_FACTOR_EPSILON {
            1.0
        } else if factor < GROUND_FACTOR_EPSILON {
            0.0
        } else {
            factor
        };
    }

    /// Derives the on ground flag from an interpolated ground factor.
    /// Returns false if the factor is unknown.
    pub fn set_on_ground_from_ground_factor(&mut self, threshold: f64) -> bool {
        let factor = self.on_ground_factor;
        if factor < 0.0 {
            return false;
        }
        let on_ground = if factor > threshold {
            IsOnGround::OnGround
        } else {
            IsOnGround::NotOnGround
        };
        self.on_ground = on_ground;
        self.on_ground_details = OnGroundDetails::ByInterpolation;
        true
    }

    /// Ground information from the network or from parts
    pub fn has_inbound_ground_details(&self) -> bool {
        matches!(
            self.on_ground_details,
            OnGroundDetails::InFromNetwork | OnGroundDetails::InFromParts
        )
    }

    /// Ground factor can be interpolated from this situation
    pub fn has_ground_details_for_gnd_interpolation(&self) -> bool {
        self.has_inbound_ground_details() && self.on_ground_factor >= 0.0
    }

    /// No authoritative ground information: on ground needs to be guessed
    pub fn should_guess_on_ground(&self) -> bool {
        !self.has_inbound_ground_details()
    }

    pub(crate) fn set_guessing_details(&mut self, details: &str) {
        if cfg!(debug_assertions) {
            self.on_ground_guessing_details = details.to_string();
        }
    }

    /// Distance [m] between altitude and ground (+ CG, if known).
    /// Negative below ground. None without elevation, or for AGL altitudes.
    pub fn ground_distance_m(&self, cg_m: Option<f64>) -> Option<f64> {
        let altitude = self.altitude()?;
        if !altitude.is_msl() {
            return None;
        }
        let elevation = self.ground_elevation.as_ref()?;
        Some(altitude.value_m - (elevation.elevation_m + cg_m.unwrap_or(0.0)))
    }

    /// Height [m] above ground (no CG considered)
    pub fn height_above_ground_m(&self) -> Option<f64> {
        self.ground_distance_m(None)
    }

    /// On ground classification from altitude, ground elevation and CG.
    ///
    /// Underflow proves "on ground", but overflow can never prove "not on ground":
    /// the elevation may be stale or wrong. Do not trust [IsOnGround::NotOnGround] alone.
    pub fn is_on_ground_by_elevation(&self, cg_m: Option<f64>) -> IsOnGround {
        let Some(distance_m) = self.ground_distance_m(cg_m) else {
            return IsOnGround::Unknown;
        };
        if distance_m < 0.0 || distance_m.abs() < DELTA_NEAR_GROUND_M {
            return IsOnGround::OnGround;
        }
        if let Some(cg_m) = cg_m {
            if distance_m.abs() < cg_m * CG_NEAR_GROUND_FACTOR {
                return IsOnGround::OnGround;
            }
        }
        IsOnGround::NotOnGround
    }

    /// Adopts the on ground bit of the best matching [AircraftParts].
    ///
    /// `parts` is expected latest first. We prefer the latest record not in the future
    /// (with respect to this situation). Otherwise, the closest future record is used if
    /// its time distance is within `time_deviation_factor` x its time offset.
    ///
    /// Network provided on ground information is never overridden.
    /// Returns the time difference (situation - parts) when adjusted.
    pub fn adjust_ground_flag(
        &mut self,
        parts: &[AircraftParts],
        always_set_details: bool,
        time_deviation_factor: f64,
    ) -> Option<Duration> {
        if self.on_ground_details == OnGroundDetails::InFromNetwork {
            return None;
        }
        if parts.is_empty() {
            return None;
        }
        if always_set_details {
            self.on_ground_details = OnGroundDetails::InFromParts;
        }

        let ts = self.adjusted_epoch();
        let best = match parts.iter().find(|p| p.adjusted_epoch() <= ts) {
            Some(past) => past,
            None => parts.last()?, // oldest future record, closest
        };

        let dt = self.adjusted_time_difference(best.adjusted_epoch());
        let in_future = dt < Duration::ZERO;
        if in_future {
            let max_dev_s = time_deviation_factor * best.time_offset.to_seconds().abs();
            if dt.abs().to_seconds() >= max_dev_s {
                return None;
            }
        }

        let on_ground = if best.on_ground {
            IsOnGround::OnGround
        } else {
            IsOnGround::NotOnGround
        };
        self.set_on_ground(on_ground, OnGroundDetails::InFromParts);
        Some(dt)
    }
}
