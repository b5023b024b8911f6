use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{FT_TO_M, SINGLE_POINT_RADIUS_M},
    geo::{great_circle_distance_m, normal_vector, Coordinate},
};

/// Ground elevation at (or around) a geodetic point,
/// valid within a given radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationPlane {
    /// Latitude [deg]
    pub latitude_deg: f64,
    /// Longitude [deg]
    pub longitude_deg: f64,
    /// Elevation above mean sea level [m]
    pub elevation_m: f64,
    /// Radius of validity [m]
    pub radius_m: f64,
}

impl ElevationPlane {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64, radius_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
            radius_m: radius_m.max(SINGLE_POINT_RADIUS_M),
        }
    }

    /// [ElevationPlane] located at given [Coordinate]
    pub fn at(coordinate: &Coordinate, elevation_m: f64, radius_m: f64) -> Self {
        Self::new(
            coordinate.latitude_deg,
            coordinate.longitude_deg,
            elevation_m,
            radius_m,
        )
    }

    /// [ElevationPlane] describing a single point
    pub fn single_point(coordinate: &Coordinate, elevation_m: f64) -> Self {
        Self::at(coordinate, elevation_m, SINGLE_POINT_RADIUS_M)
    }

    /// Elevation [ft]
    pub fn elevation_ft(&self) -> f64 {
        self.elevation_m / FT_TO_M
    }

    pub fn normal_vector(&self) -> Vector3<f64> {
        normal_vector(self.latitude_deg, self.longitude_deg)
    }

    /// Great circle distance [m] to given [Coordinate]
    pub fn distance_m(&self, coordinate: &Coordinate) -> f64 {
        great_circle_distance_m(&self.normal_vector(), &coordinate.normal_vector())
    }

    /// True if [Coordinate] lies within the radius of validity
    pub fn is_within_range(&self, coordinate: &Coordinate) -> bool {
        self.distance_m(coordinate) <= self.radius_m
    }

    /// Updates the radius, never below the single point radius
    pub fn set_radius_or_minimum(&mut self, radius_m: f64) {
        self.radius_m = radius_m.max(SINGLE_POINT_RADIUS_M);
    }
}
