use thiserror::Error;

use crate::prelude::{Callsign, Epoch};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Failed to parse [crate::prelude::InterpolatorMode]
    #[error("unknown interpolator mode")]
    UnknownInterpolatorMode,

    /// No situation has been provided for this aircraft yet.
    /// This is the expected state right after an aircraft has been added.
    #[error("no situations")]
    NoSituations,

    /// Callsign is not known to the history provider.
    #[error("unknown aircraft '{0}'")]
    UnknownAircraft(Callsign),

    /// Bracketing situations do not allow to form an interpolant
    #[error("invalid interpolant: {0}")]
    InvalidInterpolant(&'static str),

    /// Interpolation winds up here when the resulting n-vector
    /// cannot be normalized back to a geodetic position.
    #[error("invalid normal vector (interpolated position out of range)")]
    InvalidNormalVector,

    /// Interpolation produced a null situation
    #[error("null situation")]
    NullSituation,

    /// History is not sorted latest first by adjusted time
    #[error("situations not sorted latest first at {0}")]
    UnsortedSituations(Epoch),

    /// History contains a situation without position
    #[error("situation without position at index {0}")]
    NullPosition(usize),

    /// Situation does not belong to the interpolated aircraft
    #[error("wrong callsign '{found}', expected '{expected}'")]
    WrongCallsign { expected: Callsign, found: Callsign },

    /// History is longer than allowed
    #[error("too many situations: {0}")]
    TooManySituations(usize),

    /// CG is always a positive length
    #[error("negative center of gravity {0}m")]
    NegativeCG(f64),

    /// Rejected network sample: no position
    #[error("rejected situation without position")]
    RejectedNullSituation,

    /// Rejected network sample: same adjusted time as a stored one
    #[error("rejected duplicate situation at {0}")]
    DuplicateSituation(Epoch),

    /// Rejected network sample: older than the latest stored one
    #[error("rejected out of order situation at {0}")]
    OutOfOrderSituation(Epoch),
}
