mod interpolator;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{
    AircraftModel, AircraftModelProvider, AircraftParts, AircraftSituation,
    AircraftSituationChange, Altitude, Callsign, Coordinate, Epoch, RemoteAircraftProvider,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Network [AircraftSituation] sampled at `t_gpst_s`, MSL altitude in feet.
/// Default time offset applies: the adjusted time is `t_gpst_s + 6s`.
pub fn situation_at(
    callsign: &str,
    t_gpst_s: f64,
    lat_deg: f64,
    lon_deg: f64,
    alt_ft: f64,
) -> AircraftSituation {
    AircraftSituation::new(
        Callsign::new(callsign),
        Epoch::from_gpst_seconds(t_gpst_s),
        Coordinate::new(lat_deg, lon_deg, Altitude::msl_ft(alt_ft)),
    )
}

/// [StaticHistory] serves a fixed, unverified history.
/// Unlike the store, it lets us feed malformed histories.
#[derive(Default)]
pub struct StaticHistory {
    pub situations: Vec<AircraftSituation>,
    pub parts: Vec<AircraftParts>,
    pub model: Option<AircraftModel>,
}

impl RemoteAircraftProvider for StaticHistory {
    fn remote_aircraft_situations(&self, _: &Callsign) -> Vec<AircraftSituation> {
        self.situations.clone()
    }

    fn remote_aircraft_situation_changes(&self, _: &Callsign) -> Vec<AircraftSituationChange> {
        Vec::new()
    }

    fn remote_aircraft_parts(&self, _: &Callsign) -> Vec<AircraftParts> {
        self.parts.clone()
    }

    fn situations_last_modified(&self, _: &Callsign) -> u64 {
        1
    }

    fn is_aircraft_in_range(&self, _: &Callsign) -> bool {
        true
    }
}

impl AircraftModelProvider for StaticHistory {
    fn cg_m(&self, _: &Callsign) -> Option<f64> {
        self.model.as_ref().and_then(|m| m.cg_m)
    }

    fn aircraft_in_range_for_callsign(&self, _: &Callsign) -> Option<AircraftModel> {
        self.model.clone()
    }
}
