//! Unit conversions and physical thresholds

/// Feet to meters
pub const FT_TO_M: f64 = 0.3048;

/// Knots to m.s⁻¹
pub const KTS_TO_M_S: f64 = 1852.0 / 3600.0;

/// km/h to m.s⁻¹
pub const KMH_TO_M_S: f64 = 1.0 / 3.6;

/// Mean earth radius [m], used for great circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Below this ground distance [m] an aircraft is considered touching the ground
pub const DELTA_NEAR_GROUND_M: f64 = 0.5;

/// Fraction of the CG below which the ground distance still counts as "on ground"
pub const CG_NEAR_GROUND_FACTOR: f64 = 0.1;

/// Largest elevation difference [ft] between two samples we still interpolate
pub const MAX_DELTA_ELEVATION_FT: f64 = 25.0;

/// Allowed standard deviation [ft] for altitudes and elevations
/// of a [crate::prelude::AircraftSituationChange]
pub const ALLOWED_ALTITUDE_DEVIATION_FT: f64 = 1.0;

/// Radius [m] of an elevation plane describing a single point
pub const SINGLE_POINT_RADIUS_M: f64 = 1.0;

/// Time window used to decide if an elevation can be transferred
pub const TRANSFER_WINDOW_MS: f64 = 250.0;

/// Aircraft slower than this [km/h] are "not moving"
pub const NOT_MOVING_SPEED_KMH: f64 = 2.5;

/// |pitch| [deg] above which an aircraft cannot be on ground
pub const EXTREME_PITCH_DEG: f64 = 20.0;

/// |bank| [deg] above which an aircraft cannot be on ground
pub const EXTREME_BANK_DEG: f64 = 10.0;

/// Rotate speed [kt] used when the model does not tell better
pub const DEFAULT_ROTATE_SPEED_KTS: f64 = 130.0;

/// Faster than this multiple of the rotate speed means airborne
pub const ROTATE_SPEED_DISQUALIFIER: f64 = 1.25;

/// Ground factor above which an interpolated situation is on ground
pub const GROUND_FACTOR_THRESHOLD: f64 = 0.95;

/// Snapping epsilon of the ground factor
pub const GROUND_FACTOR_EPSILON: f64 = 0.001;

/// Pitch increase [deg] required to detect a rotation
pub const ROTATE_UP_PITCH_DEG: f64 = 2.0;

/// Faster than this [kt], near ground interpolation can be skipped
pub const SKIP_NEAR_GROUND_SPEED_KTS: f64 = 225.0;

/// Higher than this [m] above ground, near ground interpolation can be skipped
pub const SKIP_NEAR_GROUND_HEIGHT_M: f64 = 400.0;

/// Maximum number of situations kept per callsign
pub const MAX_SITUATIONS_PER_CALLSIGN: usize = 50;

/// Maximum number of situation changes kept per callsign
pub const MAX_SITUATION_CHANGES_PER_CALLSIGN: usize = 10;

/// Maximum number of parts kept per callsign
pub const MAX_PARTS_PER_CALLSIGN: usize = 20;

/// Number of situations summarized by a situation change
pub const SITUATION_CHANGE_WINDOW: usize = 6;

/// Epsilon used when comparing n-vectors
pub const NORMAL_VECTOR_EPSILON: f64 = 1.0E-12;

/// Default time offset of a network update
pub const DEFAULT_TIME_OFFSET_MS: f64 = 6000.0;

/// Future parts are accepted within this fraction of their time offset
pub const TIME_DEVIATION_FACTOR: f64 = 0.1;

/// Number of interpolation messages kept by an interpolator
pub const MAX_INTERPOLATION_MESSAGES: usize = 10;
