#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod aircraft;
mod cfg;
mod constants;
mod error;
mod geo;
mod interpolation;
mod provider;
mod situation;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::aircraft::{
        AircraftIcaoCode, AircraftLights, AircraftModel, AircraftParts, Callsign, PartsDetails,
        WakeCategory,
    };
    pub use crate::cfg::{InterpolationSetup, InterpolatorMode};
    pub use crate::error::Error;
    pub use crate::geo::{Altitude, AltitudeReference, Coordinate, ElevationPlane};
    pub use crate::interpolation::{
        Attitude, Grounded, InMemoryInterpolationLogger, InterpolantFunction, Interpolant,
        InterpolatedPosition, InterpolationLogger, InterpolationResult, InterpolationStatus,
        InterpolationStep, Interpolator, LinearInterpolant, PartsLog, PartsStatus, Pbh,
        Positioned, Seeded, SituationLog, SplineInterpolant,
    };
    pub use crate::provider::{
        AircraftModelProvider, ElevationCache, ElevationProvider, RemoteAircraftProvider,
        RemoteAircraftStore,
    };
    pub use crate::situation::{
        verify_situations, AircraftSituation, AircraftSituationChange, AltitudeCorrection,
        GndElevationInfo, IsOnGround, OnGroundDetails,
    };
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
