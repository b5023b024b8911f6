use hifitime::Epoch;

use crate::{
    cfg::InterpolatorMode,
    error::Error,
    geo::Coordinate,
    interpolation::{LinearInterpolant, Pbh, SplineInterpolant},
    situation::AircraftSituation,
};

/// Interpolated position, and the ground factor when it could be interpolated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedPosition {
    /// [Coordinate] at the query time
    pub coordinate: Coordinate,
    /// Ground factor, when both bracketing situations carry
    /// authoritative ground information
    pub ground_factor: Option<f64>,
}

/// Indices (in a latest first history) of the two situations
/// bracketing the query time, and elapsed time fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bracket {
    pub new_index: usize,
    pub old_index: usize,
    pub fraction: f64,
}

impl Bracket {
    /// Selects the bracketing pair of `situations` (latest first) for `now`.
    ///
    /// - after the latest situation: hold the latest one (fraction 1)
    /// - before the oldest situation: hold the oldest one (fraction 0)
    /// - a single situation is its own bracket
    pub fn new(situations: &[AircraftSituation], now: Epoch) -> Result<Self, Error> {
        match situations.len() {
            0 => return Err(Error::NoSituations),
            1 => {
                return Ok(Self {
                    new_index: 0,
                    old_index: 0,
                    fraction: 1.0,
                })
            },
            _ => {},
        }

        let (new_index, old_index) = match situations
            .iter()
            .position(|s| s.adjusted_epoch() <= now)
        {
            Some(0) => (0, 1),
            Some(older) => (older - 1, older),
            None => (situations.len() - 2, situations.len() - 1),
        };

        let (old, new) = (&situations[old_index], &situations[new_index]);
        let span_s = new.adjusted_time_difference(old.adjusted_epoch()).to_seconds();
        if span_s <= 0.0 {
            return Err(Error::InvalidInterpolant("bracketing situations not in time order"));
        }

        let elapsed_s = (now - old.adjusted_epoch()).to_seconds();
        Ok(Self {
            new_index,
            old_index,
            fraction: (elapsed_s / span_s).clamp(0.0, 1.0),
        })
    }
}

/// Interpolation function formed from a situation history, at a given query time.
pub trait InterpolantFunction {
    /// Older bracketing situation
    fn old_situation(&self) -> &AircraftSituation;

    /// Newer bracketing situation
    fn new_situation(&self) -> &AircraftSituation;

    /// Fraction of the time elapsed between old and new, within [0, 1]
    fn fraction(&self) -> f64;

    /// Number of situations this interpolant was formed from
    fn situations_available(&self) -> usize;

    /// Pitch, bank, heading and ground speed at the query time
    fn pbh(&self) -> Pbh {
        Pbh::new(self.fraction(), self.old_situation(), self.new_situation())
    }

    /// Interpolated position and altitude at the query time.
    /// Fails when the interpolated n-vector cannot be converted back to a position.
    fn interpolate_position_and_altitude(&self) -> Result<InterpolatedPosition, Error>;

    /// Ground factor blended between old and new, when both carry
    /// authoritative ground information
    fn interpolated_ground_factor(&self) -> Option<f64> {
        let (old, new) = (self.old_situation(), self.new_situation());
        if !(old.has_ground_details_for_gnd_interpolation()
            && new.has_ground_details_for_gnd_interpolation())
        {
            return None;
        }
        let (f0, f1) = (old.on_ground_factor(), new.on_ground_factor());
        Some(f0 + (f1 - f0) * self.fraction())
    }
}

/// [Interpolant] dispatches to the strategy selected by [InterpolatorMode]
#[derive(Debug, Clone)]
pub enum Interpolant {
    Linear(LinearInterpolant),
    Spline(SplineInterpolant),
}

impl Interpolant {
    /// Forms the [Interpolant] of given mode, from a latest first history, at `now`.
    pub fn new(
        mode: InterpolatorMode,
        situations: &[AircraftSituation],
        now: Epoch,
    ) -> Result<Self, Error> {
        match mode {
            InterpolatorMode::Linear => Ok(Self::Linear(LinearInterpolant::new(situations, now)?)),
            InterpolatorMode::Spline => Ok(Self::Spline(SplineInterpolant::new(situations, now)?)),
        }
    }

    pub fn mode(&self) -> InterpolatorMode {
        match self {
            Self::Linear(_) => InterpolatorMode::Linear,
            Self::Spline(_) => InterpolatorMode::Spline,
        }
    }

    fn function(&self) -> &dyn InterpolantFunction {
        match self {
            Self::Linear(linear) => linear,
            Self::Spline(spline) => spline,
        }
    }
}

impl InterpolantFunction for Interpolant {
    fn old_situation(&self) -> &AircraftSituation {
        self.function().old_situation()
    }

    fn new_situation(&self) -> &AircraftSituation {
        self.function().new_situation()
    }

    fn fraction(&self) -> f64 {
        self.function().fraction()
    }

    fn situations_available(&self) -> usize {
        self.function().situations_available()
    }

    fn interpolate_position_and_altitude(&self) -> Result<InterpolatedPosition, Error> {
        self.function().interpolate_position_and_altitude()
    }
}
