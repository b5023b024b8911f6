//! Staged completion of an interpolated situation.
//!
//! An interpolated situation is completed in a fixed order: attitude first,
//! then position and altitude, then ground flag and elevation, then corrections.
//! Each stage is a distinct type, so only forward progression is possible.
use std::marker::PhantomData;

use hifitime::Epoch;
use log::debug;

use crate::{
    aircraft::{AircraftModel, AircraftParts},
    constants::GROUND_FACTOR_THRESHOLD,
    error::Error,
    interpolation::{InterpolantFunction, Pbh},
    provider::ElevationProvider,
    situation::{
        AircraftSituation, AircraftSituationChange, AltitudeCorrection, GndElevationInfo,
        IsOnGround,
    },
};

/// Seeded, elevation preset
pub struct Seeded;
/// Pitch, bank, heading and ground speed set
pub struct Attitude;
/// Position and altitude set
pub struct Positioned;
/// Ground flag and elevation resolved
pub struct Grounded;

/// [InterpolationStep] is the working situation of one interpolation,
/// in stage `S`.
pub struct InterpolationStep<S> {
    situation: AircraftSituation,
    cg_m: Option<f64>,
    ground_interpolated: bool,
    correction: AltitudeCorrection,
    _stage: PhantomData<S>,
}

impl<S> InterpolationStep<S> {
    fn into_stage<T>(self) -> InterpolationStep<T> {
        InterpolationStep {
            situation: self.situation,
            cg_m: self.cg_m,
            ground_interpolated: self.ground_interpolated,
            correction: self.correction,
            _stage: PhantomData,
        }
    }

    /// Working situation, as of this stage
    pub fn situation(&self) -> &AircraftSituation {
        &self.situation
    }

    /// Ground flag has been derived from an interpolated ground factor
    pub fn is_ground_interpolated(&self) -> bool {
        self.ground_interpolated
    }
}

impl InterpolationStep<Seeded> {
    /// Seeds the working situation from `seed` (the last interpolated situation,
    /// or the latest known one). Identity, time offset and ground information
    /// are taken from the newer bracketing situation, and the adjusted [Epoch] is `now`.
    /// Previous ground elevation is dropped.
    pub fn seed(
        seed: AircraftSituation,
        new: &AircraftSituation,
        cg_m: Option<f64>,
        now: Epoch,
    ) -> Self {
        let mut situation = seed;
        situation.callsign = new.callsign.clone();
        situation.epoch = now - new.time_offset;
        situation.time_offset = new.time_offset;
        situation.is_interim = new.is_interim;
        situation.set_on_ground(new.on_ground(), new.on_ground_details());
        situation.set_ground_elevation(None, GndElevationInfo::NoElevationInfo, false);
        situation.set_scenery_offset_m(None);
        situation.set_cg_m(cg_m);
        Self {
            situation,
            cg_m,
            ground_interpolated: false,
            correction: AltitudeCorrection::Unknown,
            _stage: PhantomData,
        }
    }

    /// Presets the ground elevation from the bracketing pair, by priority:
    /// 1. transfer, when old and new are (nearly) at the same position
    /// 2. interpolation between old and new
    /// 3. extrapolation of the older elevation, for a stable aircraft on ground
    pub fn preset_ground_elevation(
        mut self,
        old: &AircraftSituation,
        new: &AircraftSituation,
        change: &AircraftSituationChange,
    ) -> Self {
        let s = &mut self.situation;
        if old.has_ground_elevation() {
            let radius_m = new.elevation_search_radius_m();
            let close = old.equal_normal_vector(new)
                || matches!(new.distance_m(old), Some(d) if d <= radius_m);
            if close {
                if let Some(plane) = old.ground_elevation() {
                    s.set_ground_elevation(Some(*plane), old.ground_elevation_info(), true);
                    return self;
                }
            }
        }
        if let Some(plane) = AircraftSituation::interpolated_elevation(None, old, new, None) {
            s.set_ground_elevation(Some(plane), GndElevationInfo::Interpolated, false);
            return self;
        }
        s.extrapolate_elevation(new, old, change);
        self
    }

    /// Applies interpolated pitch, bank, heading and ground speed
    pub fn with_pbh(mut self, pbh: &Pbh) -> InterpolationStep<Attitude> {
        let s = &mut self.situation;
        s.set_pitch_deg(pbh.pitch_deg());
        s.set_bank_deg(pbh.bank_deg());
        s.set_heading_deg(pbh.heading_deg());
        s.ground_speed_kts = pbh.ground_speed_kts();
        self.into_stage()
    }
}

impl InterpolationStep<Attitude> {
    /// Applies interpolated position and altitude.
    /// Fails if the interpolant produced an invalid position.
    ///
    /// When both bracketing situations carry authoritative ground information,
    /// the ground flag follows the interpolated ground factor.
    pub fn with_position_and_altitude<I: InterpolantFunction>(
        mut self,
        interpolant: &I,
    ) -> Result<InterpolationStep<Positioned>, Error> {
        let position = interpolant.interpolate_position_and_altitude()?;
        self.situation.set_position(position.coordinate);

        if self.situation.ground_elevation_info() == GndElevationInfo::Interpolated {
            // refine at the actual position
            self.situation
                .interpolate_elevation(interpolant.old_situation(), interpolant.new_situation());
        }

        if let Some(factor) = position.ground_factor {
            self.situation.set_on_ground_factor(factor);
            self.ground_interpolated = self
                .situation
                .set_on_ground_from_ground_factor(GROUND_FACTOR_THRESHOLD);
        }
        Ok(self.into_stage())
    }
}

impl InterpolationStep<Positioned> {
    /// Adopts the ground flag of network parts, unless it was interpolated
    pub fn adjust_ground_flag(
        mut self,
        parts: &[AircraftParts],
        time_deviation_factor: f64,
    ) -> Self {
        if !self.ground_interpolated && !parts.is_empty() {
            self.situation
                .adjust_ground_flag(parts, true, time_deviation_factor);
        }
        self
    }

    /// Guesses the ground flag, unless interpolated or authoritative
    pub fn guess_on_ground(
        mut self,
        change: &AircraftSituationChange,
        model: Option<&AircraftModel>,
    ) -> Self {
        if !self.ground_interpolated {
            self.situation.guess_on_ground(change, model);
        }
        self
    }

    /// Resolves a missing ground elevation: transferred from the last situation when close enough,
    /// otherwise looked up in the elevation provider. Skipped for fast or high aircraft.
    pub fn resolve_elevation(
        mut self,
        last: Option<&AircraftSituation>,
        provider: Option<&dyn ElevationProvider>,
    ) -> InterpolationStep<Grounded> {
        let s = &mut self.situation;
        if s.has_ground_elevation() || s.can_likely_skip_near_ground_interpolation() {
            return self.into_stage();
        }

        let radius_m = s.elevation_search_radius_m();
        if let Some(last) = last {
            if s.transfer_ground_elevation_to_me(last, radius_m, true) {
                return self.into_stage();
            }
        }

        if let Some(provider) = provider {
            if let Some(plane) = provider.find_closest_elevation_within_range(s, radius_m) {
                let mut plane = plane;
                plane.set_radius_or_minimum(radius_m);
                if s.set_ground_elevation_checked(&plane, GndElevationInfo::FromCache, false) {
                    debug!("{}: elevation {:.1}m from cache", s.callsign, plane.elevation_m);
                }
            }
        }
        self.into_stage()
    }
}

impl InterpolationStep<Grounded> {
    /// Compensates the guessed scenery deviation of an aircraft constantly on ground
    pub fn fix_scenery_offset(mut self, change: &AircraftSituationChange, enabled: bool) -> Self {
        if !enabled {
            return self;
        }
        if let Some(deviation_m) = change.guessed_scenery_deviation_m() {
            self.situation.add_altitude_offset_m(-deviation_m);
            self.situation.set_scenery_offset_m(Some(deviation_m));
        }
        self
    }

    /// Corrects the altitude against ground elevation and CG.
    /// Aircraft are dragged to ground only on network or parts information:
    /// an interpolated ground flag already blends altitude, and guesses are not trusted here.
    pub fn correct_altitude(mut self) -> Self {
        let drag = !self.ground_interpolated && self.situation.has_inbound_ground_details();
        self.correction = self.situation.correct_altitude(self.cg_m, drag);
        self
    }

    /// Forces pitch of aircraft on ground
    pub fn pitch_on_ground(mut self, pitch_deg: Option<f64>) -> Self {
        if let Some(pitch_deg) = pitch_deg {
            if self.situation.on_ground() == IsOnGround::OnGround {
                self.situation.set_pitch_deg(pitch_deg);
            }
        }
        self
    }

    /// [AltitudeCorrection] applied by [Self::correct_altitude]
    pub fn altitude_correction(&self) -> AltitudeCorrection {
        self.correction
    }

    /// Completed situation
    pub fn finish(self) -> Result<AircraftSituation, Error> {
        if self.situation.is_null() {
            return Err(Error::NullSituation);
        }
        Ok(self.situation)
    }
}

#[cfg(test)]
mod test {
    use super::InterpolationStep;
    use crate::{
        constants::FT_TO_M,
        prelude::{
            AircraftParts, AircraftSituation, AircraftSituationChange, AltitudeCorrection,
            Duration, ElevationCache, ElevationPlane, ElevationProvider, Epoch, GndElevationInfo,
            InterpolantFunction, IsOnGround, LinearInterpolant, OnGroundDetails,
        },
        tests::situation_at,
    };

    fn with_elevation(mut s: AircraftSituation, elevation_m: f64) -> AircraftSituation {
        let plane = ElevationPlane::single_point(s.position().unwrap(), elevation_m);
        s.set_ground_elevation(Some(plane), GndElevationInfo::FromProvider, false);
        s
    }

    #[test]
    fn preset_transfer() {
        let old = with_elevation(situation_at("FIN1", 0.0, 60.3, 24.9, 200.0), 50.0);
        let new = situation_at("FIN1", 5.0, 60.3, 24.9, 200.0);
        let step = InterpolationStep::seed(new.clone(), &new, Some(2.0), new.adjusted_epoch())
            .preset_ground_elevation(&old, &new, &AircraftSituationChange::null());
        assert_eq!(step.situation().ground_elevation_m(), Some(50.0));
        assert!(step.situation().is_elevation_info_transferred());
        assert_eq!(step.situation().cg_m(), Some(2.0));
    }

    #[test]
    fn preset_interpolation() {
        let old = with_elevation(situation_at("FIN1", 0.0, 60.3, 24.9, 200.0), 50.0);
        let new = with_elevation(situation_at("FIN1", 5.0, 60.3, 24.91, 200.0), 52.0);
        let step = InterpolationStep::seed(new.clone(), &new, None, new.adjusted_epoch())
            .preset_ground_elevation(&old, &new, &AircraftSituationChange::null());
        assert_eq!(
            step.situation().ground_elevation_info(),
            GndElevationInfo::Interpolated
        );
        assert!((step.situation().ground_elevation_m().unwrap() - 51.0).abs() < 1.0E-9);
    }

    #[test]
    fn full_step() {
        let mut old = with_elevation(situation_at("FIN1", 0.0, 60.3, 24.9, 150.0), 50.0);
        let mut new = with_elevation(situation_at("FIN1", 5.0, 60.3, 24.91, 150.0), 52.0);
        old.ground_speed_kts = 100.0;
        new.ground_speed_kts = 100.0;
        let history = vec![new.clone(), old.clone()];

        // adjusted: 11s, 6s
        let interpolant = LinearInterpolant::new(&history, Epoch::from_gpst_seconds(8.5)).unwrap();
        let change = AircraftSituationChange::null();

        let now = Epoch::from_gpst_seconds(8.5);
        let step = InterpolationStep::seed(new.clone(), &new, Some(3.0), now)
            .preset_ground_elevation(&old, &new, &change)
            .with_pbh(&interpolant.pbh())
            .with_position_and_altitude(&interpolant)
            .unwrap()
            .adjust_ground_flag(&[], 0.1)
            .guess_on_ground(&change, None)
            .resolve_elevation(None, None)
            .fix_scenery_offset(&change, true)
            .correct_altitude()
            .pitch_on_ground(Some(1.0));

        // 150ft is below 51m + 3m CG: underflow
        assert_eq!(step.altitude_correction(), AltitudeCorrection::Underflow);
        let situation = step.finish().unwrap();
        assert!((situation.altitude().unwrap().value_m - 54.0).abs() < 1.0E-6);
        assert!(situation.is_on_ground());
        assert_eq!(situation.on_ground_details(), OnGroundDetails::ByElevationAndCG);
        assert_eq!(situation.pitch_deg(), 1.0);
        assert!((situation.ground_speed_kts - 100.0).abs() < 1.0E-9);
    }

    #[test]
    fn ground_flag_from_parts() {
        let old = situation_at("FIN1", 0.0, 60.3, 24.9, 5000.0).with_ground_speed_kts(300.0);
        let new = situation_at("FIN1", 5.0, 60.3, 24.91, 5000.0).with_ground_speed_kts(300.0);
        let history = vec![new.clone(), old.clone()];
        let interpolant = LinearInterpolant::new(&history, Epoch::from_gpst_seconds(8.5)).unwrap();
        let parts = vec![AircraftParts::from_network(
            Epoch::from_gpst_seconds(7.0),
            Duration::ZERO,
            true,
        )];

        let step = InterpolationStep::seed(new.clone(), &new, None, Epoch::from_gpst_seconds(8.5))
            .with_pbh(&interpolant.pbh())
            .with_position_and_altitude(&interpolant)
            .unwrap()
            .adjust_ground_flag(&parts, 0.1)
            .guess_on_ground(&AircraftSituationChange::null(), None);
        assert_eq!(step.situation().on_ground(), IsOnGround::OnGround);
        assert_eq!(step.situation().on_ground_details(), OnGroundDetails::InFromParts);
    }

    #[test]
    fn elevation_from_provider() {
        let new = situation_at("FIN1", 5.0, 60.3, 24.9, 200.0).with_ground_speed_kts(20.0);
        let old = situation_at("FIN1", 0.0, 60.3, 24.8999, 200.0).with_ground_speed_kts(20.0);
        let cache = ElevationCache::default();
        cache.insert(ElevationPlane::single_point(new.position().unwrap(), 200.0 * FT_TO_M - 1.0));
        let provider: &dyn ElevationProvider = &cache;

        let history = vec![new.clone(), old.clone()];
        let interpolant = LinearInterpolant::new(&history, Epoch::from_gpst_seconds(11.0)).unwrap();
        let now = Epoch::from_gpst_seconds(11.0);
        let step = InterpolationStep::seed(new.clone(), &new, None, now)
            .with_pbh(&interpolant.pbh())
            .with_position_and_altitude(&interpolant)
            .unwrap()
            .resolve_elevation(None, Some(provider));
        assert_eq!(
            step.situation().ground_elevation_info(),
            GndElevationInfo::FromCache
        );
    }

    #[test]
    fn stamped_at_query_time() {
        let new = situation_at("FIN1", 5.0, 60.3, 24.9, 200.0);
        let step = InterpolationStep::seed(new.clone(), &new, None, Epoch::from_gpst_seconds(8.5));
        assert_eq!(step.situation().adjusted_epoch(), Epoch::from_gpst_seconds(8.5));
        assert_eq!(step.situation().time_offset, new.time_offset);
    }

    #[test]
    fn ground_flag_from_parts_in_between() {
        let old = situation_at("FIN1", 0.0, 60.3, 24.9, 300.0).with_ground_speed_kts(100.0);
        let new = situation_at("FIN1", 5.0, 60.3, 24.901, 300.0).with_ground_speed_kts(100.0);
        let history = vec![new.clone(), old.clone()];
        let offset = Duration::from_milliseconds(6000.0);

        // adjusted: 10s airborne, 7s on ground
        let parts = vec![
            AircraftParts::from_network(Epoch::from_gpst_seconds(4.0), offset, false),
            AircraftParts::from_network(Epoch::from_gpst_seconds(1.0), offset, true),
        ];

        let now = Epoch::from_gpst_seconds(8.5);
        let interpolant = LinearInterpolant::new(&history, now).unwrap();
        let step = InterpolationStep::seed(new.clone(), &new, None, now)
            .with_pbh(&interpolant.pbh())
            .with_position_and_altitude(&interpolant)
            .unwrap()
            .adjust_ground_flag(&parts, 0.1);
        assert_eq!(step.situation().on_ground(), IsOnGround::OnGround);
        assert_eq!(step.situation().on_ground_details(), OnGroundDetails::InFromParts);
    }

    /// Taxiing slowly on ground: 3 samples, with elevation except the latest one
    fn taxiing() -> Vec<AircraftSituation> {
        [(10.0, 24.9002, None), (5.0, 24.9001, Some(50.0)), (0.0, 24.9, Some(50.0))]
            .into_iter()
            .map(|(t, lon, elevation_m)| {
                let mut s = situation_at("FIN1", t, 60.3, lon, 200.0);
                s.set_on_ground(IsOnGround::OnGround, OnGroundDetails::InFromNetwork);
                match elevation_m {
                    Some(elevation_m) => with_elevation(s, elevation_m),
                    None => s,
                }
            })
            .collect()
    }

    #[test]
    fn preset_extrapolation() {
        let history = taxiing();
        let (new, old) = (&history[0], &history[1]);
        let change = AircraftSituationChange::new(&history, None, false);
        assert!(change.is_const_on_ground());

        let step = InterpolationStep::seed(new.clone(), new, None, Epoch::from_gpst_seconds(14.0))
            .preset_ground_elevation(old, new, &change);
        assert_eq!(
            step.situation().ground_elevation_info(),
            GndElevationInfo::Extrapolated
        );
        assert_eq!(step.situation().ground_elevation_m(), Some(50.0));

        // no stable trend: nothing to extrapolate from
        let step = InterpolationStep::seed(new.clone(), new, None, Epoch::from_gpst_seconds(14.0))
            .preset_ground_elevation(old, new, &AircraftSituationChange::null());
        assert!(!step.situation().has_ground_elevation());
    }

    #[test]
    fn scenery_offset_fix() {
        // constantly 10m above our ground
        let history = [10.0, 5.0, 0.0]
            .into_iter()
            .map(|t| {
                let mut s = situation_at("FIN1", t, 60.3, 24.9, 60.0 / FT_TO_M);
                s.set_on_ground(IsOnGround::OnGround, OnGroundDetails::InFromNetwork);
                with_elevation(s, 50.0)
            })
            .collect::<Vec<_>>();
        let change = AircraftSituationChange::new(&history, None, false);
        let deviation_m = change.guessed_scenery_deviation_m().unwrap();
        assert!((deviation_m - 10.0).abs() < 1.0E-6);

        let now = Epoch::from_gpst_seconds(14.0);
        let interpolant = LinearInterpolant::new(&history, now).unwrap();
        let grounded = |enabled: bool| {
            InterpolationStep::seed(history[0].clone(), &history[0], None, now)
                .with_pbh(&interpolant.pbh())
                .with_position_and_altitude(&interpolant)
                .unwrap()
                .resolve_elevation(None, None)
                .fix_scenery_offset(&change, enabled)
                .finish()
                .unwrap()
        };

        let fixed = grounded(true);
        assert!((fixed.altitude().unwrap().value_m - 50.0).abs() < 1.0E-6);
        assert_eq!(fixed.scenery_offset_m(), Some(deviation_m));

        let untouched = grounded(false);
        assert!((untouched.altitude().unwrap().value_m - 60.0).abs() < 1.0E-6);
        assert!(untouched.scenery_offset_m().is_none());
    }
}
