//! Geodetic coordinates and n-vector arithmetics
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{EARTH_RADIUS_M, FT_TO_M, NORMAL_VECTOR_EPSILON},
    prelude::Error,
};

mod elevation;
pub use elevation::ElevationPlane;

/// Reference datum of an [Altitude]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeReference {
    #[default]
    MeanSeaLevel,
    /// Above ground level. Ground correction of such altitudes is not supported.
    AboveGround,
}

/// Altitude, stored in meters
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Altitude {
    /// Altitude [m]
    pub value_m: f64,
    /// Reference datum
    pub reference: AltitudeReference,
}

impl Altitude {
    /// Altitude above mean sea level [m]
    pub fn msl_m(value_m: f64) -> Self {
        Self {
            value_m,
            reference: AltitudeReference::MeanSeaLevel,
        }
    }

    /// Altitude above mean sea level [ft]
    pub fn msl_ft(value_ft: f64) -> Self {
        Self::msl_m(value_ft * FT_TO_M)
    }

    /// Altitude above ground level [m]
    pub fn agl_m(value_m: f64) -> Self {
        Self {
            value_m,
            reference: AltitudeReference::AboveGround,
        }
    }

    /// Altitude [ft]
    pub fn ft(&self) -> f64 {
        self.value_m / FT_TO_M
    }

    pub fn is_msl(&self) -> bool {
        self.reference == AltitudeReference::MeanSeaLevel
    }

    /// Copies [Self] with a new value [m], same reference datum.
    pub fn with_value_m(&self, value_m: f64) -> Self {
        Self {
            value_m,
            reference: self.reference,
        }
    }
}

/// Geodetic [Coordinate]: latitude, longitude and [Altitude].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude [deg]
    pub latitude_deg: f64,
    /// Longitude [deg]
    pub longitude_deg: f64,
    /// Geodetic height
    pub altitude: Altitude,
}

impl Coordinate {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude: Altitude) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude,
        }
    }

    /// Returns earth-centred unit normal vector (n-vector) of this [Coordinate].
    pub fn normal_vector(&self) -> Vector3<f64> {
        normal_vector(self.latitude_deg, self.longitude_deg)
    }

    /// Builds a [Coordinate] from an n-vector, which does not need to be normalized
    /// (typically the result of a linear combination).
    /// Fails if the vector is out of range or degenerated.
    pub fn from_normal_vector(v: &Vector3<f64>, altitude: Altitude) -> Result<Self, Error> {
        if !is_valid_vector_range(v) {
            return Err(Error::InvalidNormalVector);
        }
        let norm = v.norm();
        if norm < NORMAL_VECTOR_EPSILON {
            return Err(Error::InvalidNormalVector);
        }
        let n = v / norm;
        let latitude_deg = n.z.clamp(-1.0, 1.0).asin().to_degrees();
        let longitude_deg = n.y.atan2(n.x).to_degrees();
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude,
        })
    }

    /// Great circle distance [m] to other [Coordinate], altitudes are not considered.
    pub fn great_circle_distance_m(&self, rhs: &Self) -> f64 {
        great_circle_distance_m(&self.normal_vector(), &rhs.normal_vector())
    }

    /// True if both coordinates share the same n-vector
    pub fn equal_normal_vector(&self, rhs: &Self) -> bool {
        equal_normal_vector(&self.normal_vector(), &rhs.normal_vector())
    }
}

/// n-vector of given latitude and longitude [deg]
pub(crate) fn normal_vector(latitude_deg: f64, longitude_deg: f64) -> Vector3<f64> {
    let (lat, lon) = (latitude_deg.to_radians(), longitude_deg.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Angle between two n-vectors times the mean earth radius
pub(crate) fn great_circle_distance_m(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let sin = a.cross(b).norm();
    let cos = a.dot(b);
    sin.atan2(cos) * EARTH_RADIUS_M
}

pub(crate) fn equal_normal_vector(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    (a - b).amax() < NORMAL_VECTOR_EPSILON
}

/// Every component of a (normalized or interpolated) n-vector is within [-1, 1]
pub fn is_valid_vector_range(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite() && (-1.0..=1.0).contains(c))
}

/// Linear combination `a + (b - a) * fraction`
pub(crate) fn lerp_normal_vector(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    fraction: f64,
) -> Vector3<f64> {
    a + (b - a) * fraction
}

/// Normalizes an angle [deg] to ]-180, 180]
pub fn normalize_deg_180(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}
