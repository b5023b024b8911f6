use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interpolation strategy
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolatorMode {
    /// Linear interpolation between the two situations bracketing
    /// the query time. Cheap and robust, but exhibits visible
    /// direction changes at every network update.
    #[default]
    Linear,

    /// Natural cubic spline through three consecutive situations.
    /// Smooth trajectories, at the expense of overshoots when
    /// updates are irregular.
    Spline,
}

impl std::fmt::Display for InterpolatorMode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linear => write!(fmt, "linear"),
            Self::Spline => write!(fmt, "spline"),
        }
    }
}

impl std::str::FromStr for InterpolatorMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "spline" => Ok(Self::Spline),
            _ => Err(Error::UnknownInterpolatorMode),
        }
    }
}
