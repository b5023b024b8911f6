//! Narrow collaborator interfaces consumed by the [crate::prelude::Interpolator],
//! and their in-memory implementations.
use crate::prelude::{
    AircraftModel, AircraftParts, AircraftSituation, AircraftSituationChange, Callsign,
    ElevationPlane,
};

mod cache;
mod store;

pub use cache::ElevationCache;
pub use store::RemoteAircraftStore;

/// Any remote aircraft history should implement the [RemoteAircraftProvider] trait.
///
/// History providers are shared between many per-aircraft interpolators
/// (typically one thread each) and the network receiver appending new samples:
/// implementations must support concurrent reads while writing.
pub trait RemoteAircraftProvider: Send + Sync {
    /// Situations of this aircraft, sorted strictly latest first
    /// by adjusted [crate::prelude::Epoch],
    /// with neither duplicates nor null situations.
    fn remote_aircraft_situations(&self, callsign: &Callsign) -> Vec<AircraftSituation>;

    /// Situation changes of this aircraft, latest first.
    fn remote_aircraft_situation_changes(&self, callsign: &Callsign)
        -> Vec<AircraftSituationChange>;

    /// Network [AircraftParts] of this aircraft,
    /// sorted latest first by adjusted [crate::prelude::Epoch].
    /// Empty when the aircraft does not support parts.
    fn remote_aircraft_parts(&self, callsign: &Callsign) -> Vec<AircraftParts>;

    /// Modification counter of the situation history. Increases with each modification.
    fn situations_last_modified(&self, callsign: &Callsign) -> u64;

    /// Aircraft is known to this provider
    fn is_aircraft_in_range(&self, callsign: &Callsign) -> bool;
}

/// Model information provider
pub trait AircraftModelProvider: Send + Sync {
    /// CG [m] of the rendered model of this aircraft
    fn cg_m(&self, callsign: &Callsign) -> Option<f64>;

    /// [AircraftModel] used to render this aircraft
    fn aircraft_in_range_for_callsign(&self, callsign: &Callsign) -> Option<AircraftModel>;
}

/// Ground elevation provider
pub trait ElevationProvider: Send + Sync {
    /// Closest known [ElevationPlane] within `range_m` of this situation.
    fn find_closest_elevation_within_range(
        &self,
        situation: &AircraftSituation,
        range_m: f64,
    ) -> Option<ElevationPlane>;
}
