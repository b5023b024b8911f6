//! Aircraft situation: kinematic state of one aircraft at one instant,
//! with ground elevation and on ground bookkeeping.
use hifitime::{Duration, Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    aircraft::Callsign,
    constants::{
        DEFAULT_TIME_OFFSET_MS, KMH_TO_M_S, KTS_TO_M_S, NOT_MOVING_SPEED_KMH,
        SINGLE_POINT_RADIUS_M, TRANSFER_WINDOW_MS,
    },
    geo::{normalize_deg_180, Altitude, Coordinate, ElevationPlane},
};

mod change;
mod correction;
mod elevation;
mod ground;
mod guess;
mod invariant;

pub use change::AircraftSituationChange;
pub use correction::AltitudeCorrection;
pub use elevation::GndElevationInfo;
pub use ground::{IsOnGround, OnGroundDetails};
pub use invariant::verify_situations;

/// [AircraftSituation] represents one aircraft's complete kinematic state at one instant.
///
/// A situation without position is "null": the sentinel "no data" state,
/// none of its other fields is meaningful.
///
/// During one interpolation step, the situation is completed in a fixed order:
/// pitch, bank, heading and speed first, then position and altitude,
/// then ground elevation and finally the on ground flag. Later stages
/// read values of the earlier ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftSituation {
    /// [Callsign] of this aircraft
    pub callsign: Callsign,
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Network time offset, the adjusted [Epoch] is `epoch + time_offset`
    pub time_offset: Duration,
    /// Ground speed [kt], negative while pushing back
    pub ground_speed_kts: f64,
    /// Interim (high frequency) update
    pub is_interim: bool,
    position: Option<Coordinate>,
    pressure_altitude: Option<Altitude>,
    heading_deg: f64,
    pitch_deg: f64,
    bank_deg: f64,
    on_ground: IsOnGround,
    on_ground_details: OnGroundDetails,
    on_ground_factor: f64,
    on_ground_guessing_details: String,
    ground_elevation: Option<ElevationPlane>,
    elevation_info: GndElevationInfo,
    elevation_transferred: bool,
    cg_m: Option<f64>,
    scenery_offset_m: Option<f64>,
}

impl Default for AircraftSituation {
    fn default() -> Self {
        Self {
            callsign: Callsign::default(),
            epoch: Epoch::default(),
            time_offset: Duration::from_milliseconds(DEFAULT_TIME_OFFSET_MS),
            ground_speed_kts: 0.0,
            is_interim: false,
            position: None,
            pressure_altitude: None,
            heading_deg: 0.0,
            pitch_deg: 0.0,
            bank_deg: 0.0,
            on_ground: IsOnGround::Unknown,
            on_ground_details: OnGroundDetails::NotSet,
            on_ground_factor: -1.0,
            on_ground_guessing_details: String::new(),
            ground_elevation: None,
            elevation_info: GndElevationInfo::NoElevationInfo,
            elevation_transferred: false,
            cg_m: None,
            scenery_offset_m: None,
        }
    }
}

impl AircraftSituation {
    /// Builds a new [AircraftSituation] at given [Coordinate].
    pub fn new(callsign: Callsign, epoch: Epoch, position: Coordinate) -> Self {
        Self {
            callsign,
            epoch,
            position: Some(position),
            ..Default::default()
        }
    }

    /// The "no situation yet" [AircraftSituation]
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.position.is_none()
    }

    /// Copies and returns [Self] with given attitude [deg]
    pub fn with_pbh(&self, pitch_deg: f64, bank_deg: f64, heading_deg: f64) -> Self {
        let mut s = self.clone();
        s.set_pitch_deg(pitch_deg);
        s.set_bank_deg(bank_deg);
        s.set_heading_deg(heading_deg);
        s
    }

    /// Copies and returns [Self] with given ground speed [kt]
    pub fn with_ground_speed_kts(&self, ground_speed_kts: f64) -> Self {
        let mut s = self.clone();
        s.ground_speed_kts = ground_speed_kts;
        s
    }

    /// Copies and returns [Self] with given time offset
    pub fn with_time_offset(&self, time_offset: Duration) -> Self {
        let mut s = self.clone();
        s.time_offset = time_offset;
        s
    }

    /// Adjusted [Epoch]: `epoch + time_offset`
    pub fn adjusted_epoch(&self) -> Epoch {
        self.epoch + self.time_offset
    }

    /// `self.adjusted - rhs.adjusted`
    pub fn adjusted_time_difference(&self, rhs_adjusted: Epoch) -> Duration {
        self.adjusted_epoch() - rhs_adjusted
    }

    pub fn position(&self) -> Option<&Coordinate> {
        self.position.as_ref()
    }

    pub fn set_position(&mut self, position: Coordinate) {
        self.position = Some(position);
    }

    /// Altitude, None for a null situation
    pub fn altitude(&self) -> Option<Altitude> {
        self.position.map(|pos| pos.altitude)
    }

    /// Updates the altitude, no effect on a null situation
    pub fn set_altitude(&mut self, altitude: Altitude) {
        if let Some(pos) = &mut self.position {
            pos.altitude = altitude;
        }
    }

    /// Shifts the altitude by given offset [m]
    pub fn add_altitude_offset_m(&mut self, offset_m: f64) {
        if let Some(pos) = &mut self.position {
            pos.altitude.value_m += offset_m;
        }
    }

    pub fn pressure_altitude(&self) -> Option<Altitude> {
        self.pressure_altitude
    }

    pub fn set_pressure_altitude(&mut self, altitude: Altitude) {
        self.pressure_altitude = Some(altitude);
    }

    /// Heading [deg], within ]-180, 180]
    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn set_heading_deg(&mut self, heading_deg: f64) {
        self.heading_deg = normalize_deg_180(heading_deg);
    }

    /// Pitch [deg], within ]-180, 180]
    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }

    pub fn set_pitch_deg(&mut self, pitch_deg: f64) {
        self.pitch_deg = normalize_deg_180(pitch_deg);
    }

    /// Bank [deg], within ]-180, 180]
    pub fn bank_deg(&self) -> f64 {
        self.bank_deg
    }

    pub fn set_bank_deg(&mut self, bank_deg: f64) {
        self.bank_deg = normalize_deg_180(bank_deg);
    }

    /// Ground speed [m.s⁻¹]
    pub fn ground_speed_m_s(&self) -> f64 {
        self.ground_speed_kts * KTS_TO_M_S
    }

    /// Moving: ground speed above walking pace, either direction
    pub fn is_moving(&self) -> bool {
        self.ground_speed_m_s().abs() >= NOT_MOVING_SPEED_KMH * KMH_TO_M_S
    }

    /// Distance [m] travelled at current ground speed in given time,
    /// never less than `min_m`
    pub fn distance_per_time_m(&self, dt: Duration, min_m: f64) -> f64 {
        (self.ground_speed_m_s().abs() * dt.to_seconds()).max(min_m)
    }

    /// Distance [m] travelled in 250 ms, never less than the single point radius
    pub fn distance_per_250ms_m(&self) -> f64 {
        self.distance_per_time_m(
            Duration::from_milliseconds(TRANSFER_WINDOW_MS),
            SINGLE_POINT_RADIUS_M,
        )
    }

    /// Great circle distance [m] to other [AircraftSituation],
    /// None if either is null.
    pub fn distance_m(&self, rhs: &Self) -> Option<f64> {
        match (&self.position, &rhs.position) {
            (Some(a), Some(b)) => Some(a.great_circle_distance_m(b)),
            _ => None,
        }
    }

    /// True if both situations are located at the same n-vector
    pub fn equal_normal_vector(&self, rhs: &Self) -> bool {
        match (&self.position, &rhs.position) {
            (Some(a), Some(b)) => a.equal_normal_vector(b),
            _ => false,
        }
    }

    /// CG [m], when known
    pub fn cg_m(&self) -> Option<f64> {
        self.cg_m
    }

    pub fn set_cg_m(&mut self, cg_m: Option<f64>) {
        self.cg_m = cg_m;
    }

    /// Scenery offset [m], when applied
    pub fn scenery_offset_m(&self) -> Option<f64> {
        self.scenery_offset_m
    }

    pub fn set_scenery_offset_m(&mut self, offset_m: Option<f64>) {
        self.scenery_offset_m = offset_m;
    }

    /// Same state as other situation, whatever the sampling time
    pub fn is_same_state(&self, rhs: &Self) -> bool {
        let mut rhs = rhs.clone();
        rhs.epoch = self.epoch;
        rhs.time_offset = self.time_offset;
        *self == rhs
    }

    /// Newer than other situation, by adjusted time
    pub fn is_newer_than_adjusted(&self, rhs: &Self) -> bool {
        self.adjusted_epoch() > rhs.adjusted_epoch()
    }
}

#[cfg(test)]
mod test {
    use super::AircraftSituation;
    use crate::{
        prelude::{Duration, Epoch},
        tests::situation_at,
    };

    #[test]
    fn null_situation() {
        let null = AircraftSituation::null();
        assert!(null.is_null());
        assert!(null.altitude().is_none());
        assert_eq!(null.on_ground_factor(), -1.0);
        assert!(!null.has_ground_elevation());
    }

    #[test]
    fn attitude_normalization() {
        let s = situation_at("AFR1", 0.0, 0.0, 0.0, 100.0).with_pbh(370.0, -190.0, 270.0);
        assert!((s.pitch_deg() - 10.0).abs() < 1.0E-9);
        assert!((s.bank_deg() - 170.0).abs() < 1.0E-9);
        assert!((s.heading_deg() + 90.0).abs() < 1.0E-9);
    }

    #[test]
    fn adjusted_time() {
        let s = situation_at("AFR1", 100.0, 0.0, 0.0, 100.0)
            .with_time_offset(Duration::from_milliseconds(6000.0));
        assert_eq!(s.adjusted_epoch(), Epoch::from_gpst_seconds(106.0));
        let diff = s.adjusted_time_difference(Epoch::from_gpst_seconds(105.0));
        assert_eq!(diff, Duration::from_seconds(1.0));
    }

    #[test]
    fn movement() {
        let s = situation_at("AFR1", 0.0, 0.0, 0.0, 100.0);
        assert!(!s.is_moving());
        assert!(s.with_ground_speed_kts(-3.0).is_moving());
        let fast = s.with_ground_speed_kts(100.0);
        // 100 kt during 250ms
        assert!((fast.distance_per_250ms_m() - 12.861).abs() < 1.0E-3);
        // never below single point radius
        assert_eq!(s.distance_per_250ms_m(), 1.0);
    }

    #[test]
    fn same_state() {
        let s = situation_at("AFR1", 0.0, 0.0, 0.0, 100.0);
        let later = situation_at("AFR1", 5.0, 0.0, 0.0, 100.0);
        assert_ne!(s, later);
        assert!(s.is_same_state(&later));
        assert!(!s.is_same_state(&later.with_ground_speed_kts(10.0)));
    }
}
