use hifitime::Epoch;

use crate::{
    error::Error,
    geo::{lerp_normal_vector, Coordinate},
    interpolation::{Bracket, InterpolantFunction, InterpolatedPosition},
    situation::AircraftSituation,
};

/// [LinearInterpolant] interpolates between the two situations bracketing the query time.
/// Positions are interpolated on the n-vector components, altitudes linearly.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    old: AircraftSituation,
    new: AircraftSituation,
    fraction: f64,
    situations_available: usize,
}

impl LinearInterpolant {
    /// Forms a [LinearInterpolant] from a latest first history at `now`
    pub fn new(situations: &[AircraftSituation], now: Epoch) -> Result<Self, Error> {
        let bracket = Bracket::new(situations, now)?;
        Ok(Self {
            old: situations[bracket.old_index].clone(),
            new: situations[bracket.new_index].clone(),
            fraction: bracket.fraction,
            situations_available: situations.len(),
        })
    }
}

impl InterpolantFunction for LinearInterpolant {
    fn old_situation(&self) -> &AircraftSituation {
        &self.old
    }

    fn new_situation(&self) -> &AircraftSituation {
        &self.new
    }

    fn fraction(&self) -> f64 {
        self.fraction
    }

    fn situations_available(&self) -> usize {
        self.situations_available
    }

    fn interpolate_position_and_altitude(&self) -> Result<InterpolatedPosition, Error> {
        let (old, new) = match (self.old.position(), self.new.position()) {
            (Some(old), Some(new)) => (old, new),
            _ => return Err(Error::NullSituation),
        };

        let n = lerp_normal_vector(&old.normal_vector(), &new.normal_vector(), self.fraction);

        let (old_m, new_m) = (old.altitude.value_m, new.altitude.value_m);
        let altitude = new
            .altitude
            .with_value_m(old_m + (new_m - old_m) * self.fraction);

        Ok(InterpolatedPosition {
            coordinate: Coordinate::from_normal_vector(&n, altitude)?,
            ground_factor: self.interpolated_ground_factor(),
        })
    }
}
