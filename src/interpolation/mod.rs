//! Per aircraft interpolation of situations and parts
use std::{collections::VecDeque, sync::Arc};

use hifitime::{Duration, Epoch};
use log::{debug, warn};

use crate::{
    aircraft::{AircraftModel, AircraftParts, Callsign},
    cfg::InterpolationSetup,
    constants::{DEFAULT_TIME_OFFSET_MS, MAX_INTERPOLATION_MESSAGES, MAX_SITUATIONS_PER_CALLSIGN},
    error::Error,
    provider::{AircraftModelProvider, ElevationProvider, RemoteAircraftProvider},
    situation::{verify_situations, AircraftSituation, AircraftSituationChange},
};

mod interpolant;
mod linear;
mod logger;
mod pbh;
mod spline;
mod status;
mod step;

pub(crate) use interpolant::Bracket;

pub use interpolant::{InterpolantFunction, InterpolatedPosition, Interpolant};
pub use linear::LinearInterpolant;
pub use logger::{InMemoryInterpolationLogger, InterpolationLogger, PartsLog, SituationLog};
pub use pbh::Pbh;
pub use spline::SplineInterpolant;
pub use status::{InterpolationResult, InterpolationStatus, PartsStatus};
pub use step::{Attitude, Grounded, InterpolationStep, Positioned, Seeded};

/// [Interpolator] produces one smooth and plausible situation (and parts)
/// of a remote aircraft, per simulator frame.
///
/// It is owned by exactly one per aircraft client, and driven synchronously by its frame tick.
/// Situation history, model and elevations are pulled from shared providers,
/// and cached until the history is modified.
///
/// Every failure degrades to the last valid situation: the caller always receives something
/// plausible to render. Details are reported in the [InterpolationStatus].
pub struct Interpolator {
    /// [Callsign] of the interpolated aircraft
    callsign: Callsign,
    aircraft: Arc<dyn RemoteAircraftProvider>,
    models: Arc<dyn AircraftModelProvider>,
    elevations: Option<Arc<dyn ElevationProvider>>,
    logger: Option<Arc<dyn InterpolationLogger>>,
    /// Cached situations, latest first
    situations: Vec<AircraftSituation>,
    /// Cached situation change
    change: AircraftSituationChange,
    situations_last_modified: Option<u64>,
    last_setup: Option<InterpolationSetup>,
    model: Option<AircraftModel>,
    cg_m: Option<f64>,
    /// Last valid interpolated situation
    last_situation: Option<AircraftSituation>,
    /// [Epoch] of the last valid interpolation
    last_valid: Option<Epoch>,
    last_parts: Option<AircraftParts>,
    /// Number of calls
    counter: u64,
    parts_counter: u64,
    interpolated_situations: u64,
    invalid_situations: u64,
    last_invalid_log: Option<Epoch>,
    messages: VecDeque<String>,
}

impl Interpolator {
    /// Builds a new [Interpolator] for this aircraft
    pub fn new(
        callsign: Callsign,
        aircraft: Arc<dyn RemoteAircraftProvider>,
        models: Arc<dyn AircraftModelProvider>,
        elevations: Option<Arc<dyn ElevationProvider>>,
    ) -> Self {
        Self {
            callsign,
            aircraft,
            models,
            elevations,
            logger: None,
            situations: Vec::new(),
            change: AircraftSituationChange::null(),
            situations_last_modified: None,
            last_setup: None,
            model: None,
            cg_m: None,
            last_situation: None,
            last_valid: None,
            last_parts: None,
            counter: 0,
            parts_counter: 0,
            interpolated_situations: 0,
            invalid_situations: 0,
            last_invalid_log: None,
            messages: VecDeque::new(),
        }
    }

    /// Copies and returns [Self] with given [InterpolationLogger]
    pub fn with_logger(mut self, logger: Arc<dyn InterpolationLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    /// Number of successfully interpolated situations
    pub fn interpolated_situations_counter(&self) -> u64 {
        self.interpolated_situations
    }

    /// Number of calls that could not interpolate a valid situation
    pub fn invalid_situations(&self) -> u64 {
        self.invalid_situations
    }

    /// Latest (rate limited) interpolation warnings, oldest first
    pub fn interpolation_messages(&self) -> Vec<String> {
        self.messages.iter().cloned().collect()
    }

    /// Last valid interpolated situation
    pub fn last_interpolated_situation(&self) -> Option<&AircraftSituation> {
        self.last_situation.as_ref()
    }

    /// Forgets cached situations and outputs, for example once the aircraft has been re-added.
    pub fn reset(&mut self) {
        self.situations.clear();
        self.change = AircraftSituationChange::null();
        self.situations_last_modified = None;
        self.last_setup = None;
        self.last_situation = None;
        self.last_valid = None;
        self.last_parts = None;
        self.last_invalid_log = None;
    }

    /// Refreshes cached situations (when modified) and model (periodically).
    fn init_step_data(
        &mut self,
        setup: &InterpolationSetup,
        aircraft_number: u32,
    ) -> Result<(), Error> {
        if !self.aircraft.is_aircraft_in_range(&self.callsign) {
            return Err(Error::UnknownAircraft(self.callsign.clone()));
        }

        let modified = self.aircraft.situations_last_modified(&self.callsign);
        let setup_changed = self.last_setup.as_ref() != Some(setup);
        if self.situations_last_modified != Some(modified) || setup_changed {
            self.situations = self.aircraft.remote_aircraft_situations(&self.callsign);
            self.change = self
                .aircraft
                .remote_aircraft_situation_changes(&self.callsign)
                .into_iter()
                .next()
                .unwrap_or_default();
            self.situations_last_modified = Some(modified);
            self.last_setup = Some(setup.clone());
            debug!(
                "{}: {} situations (modification {})",
                self.callsign,
                self.situations.len(),
                modified
            );
        }

        let refresh =
            (self.counter + aircraft_number as u64) % setup.cg_refresh_ratio() as u64 == 0;
        if self.cg_m.is_none() || refresh {
            self.cg_m = self.models.cg_m(&self.callsign);
            self.model = self.models.aircraft_in_range_for_callsign(&self.callsign);
            debug!("{}: CG {:?}", self.callsign, self.cg_m);
        }

        if cfg!(debug_assertions) {
            let verified =
                verify_situations(&self.situations, &self.callsign, MAX_SITUATIONS_PER_CALLSIGN);
            debug_assert!(verified.is_ok(), "{}: {:?}", self.callsign, verified);
        }

        if self.situations.is_empty() {
            return Err(Error::NoSituations);
        }
        Ok(())
    }

    /// Interpolates the situation at `now`.
    fn interpolate_situation(
        &self,
        now: Epoch,
        setup: &InterpolationSetup,
        parts: &[AircraftParts],
    ) -> Result<(AircraftSituation, Option<SituationLog>), Error> {
        let interpolant = Interpolant::new(setup.mode, &self.situations, now)?;
        let (old, new) = (interpolant.old_situation(), interpolant.new_situation());

        let seed = match &self.last_situation {
            Some(last) => last.clone(),
            None => self.situations[0].clone(),
        };

        let step = InterpolationStep::seed(seed, new, self.cg_m, now)
            .preset_ground_elevation(old, new, &self.change)
            .with_pbh(&interpolant.pbh())
            .with_position_and_altitude(&interpolant)?
            .adjust_ground_flag(parts, setup.time_deviation_factor)
            .guess_on_ground(&self.change, self.model.as_ref())
            .resolve_elevation(self.last_situation.as_ref(), self.elevations.as_deref())
            .fix_scenery_offset(&self.change, setup.fix_scenery_offset)
            .correct_altitude()
            .pitch_on_ground(setup.pitch_on_ground_deg);

        let log = if setup.log_interpolation && self.logger.is_some() {
            Some(SituationLog {
                callsign: self.callsign.clone(),
                now,
                mode: interpolant.mode(),
                counter: self.counter,
                old_situation: old.clone(),
                new_situation: new.clone(),
                interpolated: step.situation().clone(),
                fraction: interpolant.fraction(),
                cg_m: self.cg_m,
                altitude_correction: step.altitude_correction(),
                ground_interpolated: step.is_ground_interpolated(),
                situations_count: interpolant.situations_available(),
                change: self.change.clone(),
            })
        } else {
            None
        };

        Ok((step.finish()?, log))
    }

    /// Records an invalid situation. Warnings are rate limited:
    /// at most one per time offset of the latest situation.
    fn invalid_situation(&mut self, now: Epoch, error: &Error) {
        self.invalid_situations += 1;

        let offset = self
            .situations
            .first()
            .map(|s| s.time_offset)
            .unwrap_or_else(|| Duration::from_milliseconds(DEFAULT_TIME_OFFSET_MS));

        let due = match self.last_invalid_log {
            Some(last) => now - last > offset,
            None => true,
        };
        if !due {
            return;
        }

        let message = match self.last_valid {
            Some(last_valid) => format!(
                "{}: invalid situation, {:.0}ms since last valid one: {}",
                self.callsign,
                (now - last_valid).to_seconds() * 1000.0,
                error
            ),
            None => format!(
                "{}: invalid situation, never had a valid one: {}",
                self.callsign, error
            ),
        };
        warn!("{}", message);

        if self.messages.len() >= MAX_INTERPOLATION_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
        self.last_invalid_log = Some(now);
    }

    /// Situation (and parts) of this aircraft at `now`.
    ///
    /// - `setup`: interpolation setup of this aircraft
    /// - `aircraft_number`: index of this aircraft, used to spread periodic work
    ///   (CG refresh, parts) of many aircraft over successive calls
    pub fn get_interpolation(
        &mut self,
        now: Epoch,
        setup: &InterpolationSetup,
        aircraft_number: u32,
    ) -> InterpolationResult {
        self.counter += 1;
        let mut result = InterpolationResult::default();

        let parts_history = if setup.aircraft_parts_enabled {
            self.aircraft.remote_aircraft_parts(&self.callsign)
        } else {
            Vec::new()
        };

        match self.init_step_data(setup, aircraft_number) {
            Ok(()) => match self.interpolate_situation(now, setup, &parts_history) {
                Ok((situation, log)) => {
                    let status = &mut result.interpolation_status;
                    status.set_interpolated(true);
                    status.set_valid_situation(true);
                    status.set_situations_count(self.situations.len());
                    status.set_same_situation(
                        self.last_situation
                            .as_ref()
                            .is_some_and(|last| last.is_same_state(&situation)),
                    );
                    self.interpolated_situations += 1;
                    self.last_valid = Some(now);
                    self.last_situation = Some(situation.clone());
                    result.situation = situation;
                    if let (Some(log), Some(logger)) = (log, &self.logger) {
                        logger.log_situation(log);
                    }
                },
                Err(error) => {
                    self.invalid_situation(now, &error);
                    let status = &mut result.interpolation_status;
                    status.set_same_situation(true);
                    status.set_valid_situation(self.last_situation.is_some());
                    status.set_situations_count(self.situations.len());
                    status.set_extra_info(&error.to_string());
                    result.situation = self.last_situation.clone().unwrap_or_default();
                },
            },
            Err(error) => {
                // expected right after an aircraft has been added
                debug!("{}: {}", self.callsign, error);
                result.interpolation_status.set_extra_info(&error.to_string());
                result.situation = AircraftSituation::null();
            },
        }

        if setup.aircraft_parts_enabled {
            let (parts, status) =
                self.interpolated_or_guessed_parts(now, setup, aircraft_number, &parts_history);
            result.parts = parts;
            result.parts_status = status;
            if setup.log_interpolation {
                if let Some(logger) = &self.logger {
                    logger.log_parts(PartsLog {
                        callsign: self.callsign.clone(),
                        now,
                        counter: self.counter,
                        parts: result.parts.clone(),
                        status,
                    });
                }
            }
        }
        result
    }

    /// Parts at `now`. Parts are only recomputed every n-th call (staggered by `aircraft_number`),
    /// and reused in between.
    ///
    /// Network parts: latest record not newer than `now`, or else the oldest future record.
    /// Without network parts, parts are guessed from the last situation (every n-th parts
    /// computation only).
    fn interpolated_or_guessed_parts(
        &mut self,
        now: Epoch,
        setup: &InterpolationSetup,
        aircraft_number: u32,
        parts_history: &[AircraftParts],
    ) -> (Option<AircraftParts>, PartsStatus) {
        let mut status = PartsStatus::default();
        status.set_supporting_parts(!parts_history.is_empty());

        let tick = self.counter + aircraft_number as u64;
        let due = tick % setup.parts_interpolation_ratio() as u64 == 0;
        if !due && self.last_parts.is_some() {
            status.set_reused_parts(true);
            status.set_same_parts(true);
            return (self.last_parts.clone(), status);
        }

        let parts = if !parts_history.is_empty() {
            // latest first: records newer than now come first
            let past = parts_history.partition_point(|p| p.adjusted_epoch() > now);
            parts_history
                .get(past)
                .or_else(|| parts_history.last())
                .cloned()
        } else {
            self.parts_counter += 1;
            let guess_due = self.parts_counter % setup.parts_guessing_ratio() as u64 == 1
                || setup.parts_guessing_ratio() == 1;
            match &self.last_situation {
                Some(_) if !guess_due && self.last_parts.is_some() => {
                    status.set_reused_parts(true);
                    self.last_parts.clone()
                },
                Some(situation) => {
                    let model = self.model.clone().unwrap_or_default();
                    Some(AircraftParts::guessed(situation, &self.change, &model))
                },
                None => None,
            }
        };

        status.set_same_parts(parts.is_some() && parts == self.last_parts);
        if parts.is_some() {
            self.last_parts = parts.clone();
        }
        (parts, status)
    }
}
