use std::{collections::VecDeque, sync::Mutex};

use hifitime::Epoch;

use crate::{
    aircraft::{AircraftParts, Callsign},
    cfg::InterpolatorMode,
    interpolation::PartsStatus,
    situation::{AircraftSituation, AircraftSituationChange, AltitudeCorrection},
};

/// Default number of records kept by the [InMemoryInterpolationLogger], per record type
const DEFAULT_CAPACITY: usize = 500;

/// Diagnostic record of one situation interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct SituationLog {
    pub callsign: Callsign,
    /// Query [Epoch]
    pub now: Epoch,
    pub mode: InterpolatorMode,
    /// Number of calls so far
    pub counter: u64,
    pub old_situation: AircraftSituation,
    pub new_situation: AircraftSituation,
    pub interpolated: AircraftSituation,
    /// Elapsed time fraction between old and new
    pub fraction: f64,
    pub cg_m: Option<f64>,
    pub altitude_correction: AltitudeCorrection,
    /// Ground factor has been interpolated
    pub ground_interpolated: bool,
    pub situations_count: usize,
    pub change: AircraftSituationChange,
}

/// Diagnostic record of one parts interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct PartsLog {
    pub callsign: Callsign,
    /// Query [Epoch]
    pub now: Epoch,
    /// Number of calls so far
    pub counter: u64,
    pub parts: Option<AircraftParts>,
    pub status: PartsStatus,
}

/// Side channel for diagnostic records. Shared between many interpolators,
/// possibly running on different threads.
pub trait InterpolationLogger: Send + Sync {
    fn log_situation(&self, log: SituationLog);
    fn log_parts(&self, log: PartsLog);
}

/// [InMemoryInterpolationLogger] keeps the latest records in memory
pub struct InMemoryInterpolationLogger {
    capacity: usize,
    situations: Mutex<VecDeque<SituationLog>>,
    parts: Mutex<VecDeque<PartsLog>>,
}

impl Default for InMemoryInterpolationLogger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn push_bounded<T>(queue: &Mutex<VecDeque<T>>, capacity: usize, record: T) {
    if let Ok(mut queue) = queue.lock() {
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(record);
    }
}

impl InMemoryInterpolationLogger {
    /// Builds a new logger keeping at most `capacity` records of each type
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            situations: Mutex::new(VecDeque::new()),
            parts: Mutex::new(VecDeque::new()),
        }
    }

    /// Situation records of this aircraft, oldest first
    pub fn situation_logs(&self, callsign: &Callsign) -> Vec<SituationLog> {
        self.situations
            .lock()
            .map(|logs| {
                logs.iter()
                    .filter(|log| log.callsign == *callsign)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parts records of this aircraft, oldest first
    pub fn parts_logs(&self, callsign: &Callsign) -> Vec<PartsLog> {
        self.parts
            .lock()
            .map(|logs| {
                logs.iter()
                    .filter(|log| log.callsign == *callsign)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Latest situation record of this aircraft
    pub fn latest_situation_log(&self, callsign: &Callsign) -> Option<SituationLog> {
        let logs = self.situations.lock().ok()?;
        logs.iter().rev().find(|log| log.callsign == *callsign).cloned()
    }

    pub fn clear(&self) {
        if let Ok(mut logs) = self.situations.lock() {
            logs.clear();
        }
        if let Ok(mut logs) = self.parts.lock() {
            logs.clear();
        }
    }
}

impl InterpolationLogger for InMemoryInterpolationLogger {
    fn log_situation(&self, log: SituationLog) {
        push_bounded(&self.situations, self.capacity, log);
    }

    fn log_parts(&self, log: PartsLog) {
        push_bounded(&self.parts, self.capacity, log);
    }
}
