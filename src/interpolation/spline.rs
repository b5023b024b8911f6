use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    error::Error,
    geo::Coordinate,
    interpolation::{Bracket, InterpolantFunction, InterpolatedPosition},
    situation::AircraftSituation,
};

/// Knot values: n-vector components and altitude [m]
type Knot = [f64; 4];

/// Natural cubic spline (zero curvature at both ends) through 2 or 3 knots,
/// evaluated at `t`. Two knots degenerate to a straight line.
fn natural_spline(times: &[f64], knots: &[Knot], t: f64) -> Knot {
    let n = times.len();
    let mut out = [0.0; 4];

    // second derivatives
    let mut m = [[0.0; 4]; 3];
    if n == 3 {
        let (h0, h1) = (times[1] - times[0], times[2] - times[1]);
        for c in 0..4 {
            let (y0, y1, y2) = (knots[0][c], knots[1][c], knots[2][c]);
            m[1][c] = 3.0 * ((y2 - y1) / h1 - (y1 - y0) / h0) / (h0 + h1);
        }
    }

    let segment = if n == 3 && t > times[1] { 1 } else { 0 };
    let (ti, tj) = (times[segment], times[segment + 1]);
    let h = tj - ti;
    for (c, value) in out.iter_mut().enumerate() {
        let (yi, yj) = (knots[segment][c], knots[segment + 1][c]);
        let (mi, mj) = (m[segment][c], m[segment + 1][c]);
        *value = mi * (tj - t).powi(3) / (6.0 * h)
            + mj * (t - ti).powi(3) / (6.0 * h)
            + (yi / h - mi * h / 6.0) * (tj - t)
            + (yj / h - mj * h / 6.0) * (t - ti);
    }
    out
}

/// [SplineInterpolant] fits a natural cubic spline through three consecutive situations:
/// the bracketing pair and one neighbour. Positions are interpolated on the n-vector
/// components, and need to be normalized afterwards.
#[derive(Debug, Clone)]
pub struct SplineInterpolant {
    old: AircraftSituation,
    new: AircraftSituation,
    fraction: f64,
    situations_available: usize,
    /// seconds since the first knot
    times: Vec<f64>,
    knots: Vec<Knot>,
    /// query time, seconds since the first knot
    t: f64,
}

impl SplineInterpolant {
    /// Forms a [SplineInterpolant] from a latest first history at `now`
    pub fn new(situations: &[AircraftSituation], now: Epoch) -> Result<Self, Error> {
        let bracket = Bracket::new(situations, now)?;
        let (old, new) = (
            &situations[bracket.old_index],
            &situations[bracket.new_index],
        );

        // oldest to newest
        let indices = if bracket.old_index == bracket.new_index {
            vec![bracket.old_index]
        } else if bracket.old_index + 1 < situations.len() {
            vec![bracket.old_index + 1, bracket.old_index, bracket.new_index]
        } else if bracket.new_index > 0 {
            vec![bracket.old_index, bracket.new_index, bracket.new_index - 1]
        } else {
            vec![bracket.old_index, bracket.new_index]
        };

        let t0 = situations[indices[0]].adjusted_epoch();
        let mut times = Vec::with_capacity(indices.len());
        let mut knots = Vec::with_capacity(indices.len());
        for index in indices {
            let situation = &situations[index];
            let position = situation.position().ok_or(Error::NullSituation)?;
            let n = position.normal_vector();
            times.push(situation.adjusted_time_difference(t0).to_seconds());
            knots.push([n.x, n.y, n.z, position.altitude.value_m]);
        }

        if times.iter().zip(times.iter().skip(1)).any(|(a, b)| b <= a) {
            return Err(Error::InvalidInterpolant("spline knots not in time order"));
        }

        let t_old = old.adjusted_time_difference(t0).to_seconds();
        let t_new = new.adjusted_time_difference(t0).to_seconds();

        Ok(Self {
            old: old.clone(),
            new: new.clone(),
            fraction: bracket.fraction,
            situations_available: situations.len(),
            t: t_old + (t_new - t_old) * bracket.fraction,
            times,
            knots,
        })
    }
}

impl InterpolantFunction for SplineInterpolant {
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
        let new_position = self.new.position().ok_or(Error::NullSituation)?;

        let value = if self.knots.len() == 1 {
            self.knots[0]
        } else {
            natural_spline(&self.times, &self.knots, self.t)
        };

        let n = Vector3::new(value[0], value[1], value[2]);
        let altitude = new_position.altitude.with_value_m(value[3]);

        Ok(InterpolatedPosition {
            coordinate: Coordinate::from_normal_vector(&n, altitude)?,
            ground_factor: self.interpolated_ground_factor(),
        })
    }
}
