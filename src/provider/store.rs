use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use log::debug;

use crate::{
    constants::{
        MAX_PARTS_PER_CALLSIGN, MAX_SITUATIONS_PER_CALLSIGN, MAX_SITUATION_CHANGES_PER_CALLSIGN,
        TIME_DEVIATION_FACTOR,
    },
    error::Error,
    prelude::{
        AircraftModel, AircraftParts, AircraftSituation, AircraftSituationChange, Callsign,
        PartsDetails,
    },
    provider::{AircraftModelProvider, RemoteAircraftProvider},
};

/// History of one remote aircraft
#[derive(Default)]
struct AircraftHistory {
    /// latest first
    situations: Vec<AircraftSituation>,
    /// latest first
    changes: Vec<AircraftSituationChange>,
    /// latest first
    parts: Vec<AircraftParts>,
    last_modified: u64,
    model: Option<AircraftModel>,
}

impl AircraftHistory {
    fn cg_m(&self) -> Option<f64> {
        self.model.as_ref().map(|model| model.cg_or_guessed_m())
    }

    fn is_vtol(&self) -> bool {
        self.model.as_ref().map(|model| model.is_vtol()).unwrap_or(false)
    }
}

/// [RemoteAircraftStore] is an in-memory, thread safe history of remote aircraft,
/// as fed by the network layer. Each aircraft is locked independently:
/// the network layer writes one aircraft while interpolators read the others.
///
/// It implements both [RemoteAircraftProvider] and [AircraftModelProvider].
#[derive(Default)]
pub struct RemoteAircraftStore {
    aircraft: DashMap<Callsign, AircraftHistory>,
    modifications: AtomicU64,
}

impl RemoteAircraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_modification(&self) -> u64 {
        self.modifications.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Registers an aircraft with its rendered [AircraftModel].
    /// An already known aircraft keeps its history.
    pub fn add_aircraft(&self, model: AircraftModel) {
        let mut history = self.aircraft.entry(model.callsign.clone()).or_default();
        history.model = Some(model);
    }

    /// Removes an aircraft and its history. Returns true if it was known.
    pub fn remove_aircraft(&self, callsign: &Callsign) -> bool {
        self.aircraft.remove(callsign).is_some()
    }

    /// Number of known aircraft
    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Updates the CG [m] of a known aircraft model
    pub fn set_cg_m(&self, callsign: &Callsign, cg_m: f64) -> bool {
        let Some(mut history) = self.aircraft.get_mut(callsign) else {
            return false;
        };
        match history.model.as_mut() {
            Some(model) => {
                model.cg_m = Some(cg_m);
                true
            },
            None => false,
        }
    }

    /// Inserts a new network situation. Unknown aircraft are implicitly registered.
    ///
    /// - null situations are rejected
    /// - situations not strictly newer (adjusted time) than the latest one are rejected
    /// - the ground elevation of the previous situation is transferred when both
    ///   share the same position
    /// - the ground flag is adjusted from known parts
    ///
    /// The situation change is recomputed on every accepted situation.
    pub fn insert_situation(&self, mut situation: AircraftSituation) -> Result<(), Error> {
        if situation.is_null() {
            return Err(Error::RejectedNullSituation);
        }

        let mut history = self.aircraft.entry(situation.callsign.clone()).or_default();

        if let Some(latest) = history.situations.first() {
            let (latest_ts, ts) = (latest.adjusted_epoch(), situation.adjusted_epoch());
            if ts == latest_ts {
                debug!("{}: rejected duplicate situation at {}", situation.callsign, ts);
                return Err(Error::DuplicateSituation(ts));
            }
            if ts < latest_ts {
                debug!("{}: rejected out of order situation at {}", situation.callsign, ts);
                return Err(Error::OutOfOrderSituation(ts));
            }
            if !situation.has_ground_elevation() {
                situation.transfer_ground_elevation_from_same_position(latest);
            }
        }

        if !history.parts.is_empty() {
            situation.adjust_ground_flag(&history.parts, false, TIME_DEVIATION_FACTOR);
        }

        history.situations.insert(0, situation);
        history.situations.truncate(MAX_SITUATIONS_PER_CALLSIGN);

        let change =
            AircraftSituationChange::new(&history.situations, history.cg_m(), history.is_vtol());
        history.changes.insert(0, change);
        history.changes.truncate(MAX_SITUATION_CHANGES_PER_CALLSIGN);

        history.last_modified = self.next_modification();
        Ok(())
    }

    /// Inserts network [AircraftParts] of given aircraft, kept sorted latest first.
    /// Parts with the same adjusted time as a stored record replace it.
    pub fn insert_parts(&self, callsign: &Callsign, parts: AircraftParts) {
        let mut history = self.aircraft.entry(callsign.clone()).or_default();
        let ts = parts.adjusted_epoch();
        let index = history.parts.partition_point(|p| p.adjusted_epoch() > ts);
        match history.parts.get_mut(index) {
            Some(existing) if existing.adjusted_epoch() == ts => *existing = parts,
            _ => history.parts.insert(index, parts),
        }
        history.parts.truncate(MAX_PARTS_PER_CALLSIGN);
    }
}

impl RemoteAircraftProvider for RemoteAircraftStore {
    fn remote_aircraft_situations(&self, callsign: &Callsign) -> Vec<AircraftSituation> {
        self.aircraft
            .get(callsign)
            .map(|h| h.situations.clone())
            .unwrap_or_default()
    }

    fn remote_aircraft_situation_changes(
        &self,
        callsign: &Callsign,
    ) -> Vec<AircraftSituationChange> {
        self.aircraft
            .get(callsign)
            .map(|h| h.changes.clone())
            .unwrap_or_default()
    }

    fn remote_aircraft_parts(&self, callsign: &Callsign) -> Vec<AircraftParts> {
        self.aircraft
            .get(callsign)
            .map(|h| {
                h.parts
                    .iter()
                    .filter(|p| p.details == PartsDetails::FromNetwork)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn situations_last_modified(&self, callsign: &Callsign) -> u64 {
        self.aircraft
            .get(callsign)
            .map(|h| h.last_modified)
            .unwrap_or(0)
    }

    fn is_aircraft_in_range(&self, callsign: &Callsign) -> bool {
        self.aircraft.contains_key(callsign)
    }
}

impl AircraftModelProvider for RemoteAircraftStore {
    fn cg_m(&self, callsign: &Callsign) -> Option<f64> {
        self.aircraft.get(callsign).and_then(|h| h.cg_m())
    }

    fn aircraft_in_range_for_callsign(&self, callsign: &Callsign) -> Option<AircraftModel> {
        self.aircraft.get(callsign).and_then(|h| h.model.clone())
    }
}
