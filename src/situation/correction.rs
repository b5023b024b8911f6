use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::DELTA_NEAR_GROUND_M,
    geo::Altitude,
    situation::{AircraftSituation, OnGroundDetails},
};

/// Outcome of an altitude correction
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeCorrection {
    /// Altitude was kept
    NoCorrection,
    /// Altitude was below ground (+ CG) and has been raised to it
    Underflow,
    /// Aircraft on ground, above ground: dragged down to it
    DraggedToGround,
    /// AGL altitudes are not corrected
    Agl,
    /// No ground elevation to correct against
    NoElevation,
    #[default]
    Unknown,
}

impl std::fmt::Display for AltitudeCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoCorrection => write!(f, "no correction"),
            Self::Underflow => write!(f, "underflow"),
            Self::DraggedToGround => write!(f, "dragged to ground"),
            Self::Agl => write!(f, "AGL"),
            Self::NoElevation => write!(f, "no elevation"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl AltitudeCorrection {
    /// Altitude has been modified
    pub fn is_corrected(&self) -> bool {
        matches!(self, Self::Underflow | Self::DraggedToGround)
    }
}

impl AircraftSituation {
    /// Provenances trusted enough to drag an aircraft down to the ground.
    fn can_drag_to_ground(&self) -> bool {
        self.is_on_ground()
            && matches!(
                self.on_ground_details(),
                OnGroundDetails::InFromNetwork
                    | OnGroundDetails::InFromParts
                    | OnGroundDetails::ByGuessing
            )
    }

    /// Altitude corrected against ground elevation (+ CG).
    ///
    /// - below ground: raised to ground
    /// - within the near ground threshold: kept
    /// - above ground but flagged on ground by a trusted source:
    ///   dragged to ground when `enable_drag_to_ground`
    ///
    /// AGL altitudes are not supported and returned as is.
    pub fn corrected_altitude(
        &self,
        cg_m: Option<f64>,
        enable_drag_to_ground: bool,
    ) -> (Option<Altitude>, AltitudeCorrection) {
        let Some(altitude) = self.altitude() else {
            return (None, AltitudeCorrection::Unknown);
        };
        if !altitude.is_msl() {
            debug!(
                "{}: altitude correction of AGL altitudes is not supported",
                self.callsign
            );
            return (Some(altitude), AltitudeCorrection::Agl);
        }
        let Some(plane) = self.ground_elevation() else {
            return (Some(altitude), AltitudeCorrection::NoElevation);
        };

        let ground_plus_cg_m = plane.elevation_m + cg_m.unwrap_or(0.0);
        let distance_m = altitude.value_m - ground_plus_cg_m;

        if distance_m < 0.0 {
            return (
                Some(altitude.with_value_m(ground_plus_cg_m)),
                AltitudeCorrection::Underflow,
            );
        }
        if distance_m < DELTA_NEAR_GROUND_M {
            return (Some(altitude), AltitudeCorrection::NoCorrection);
        }
        if enable_drag_to_ground && self.can_drag_to_ground() {
            return (
                Some(altitude.with_value_m(ground_plus_cg_m)),
                AltitudeCorrection::DraggedToGround,
            );
        }
        (Some(altitude), AltitudeCorrection::NoCorrection)
    }

    /// Corrects altitude in place, see [Self::corrected_altitude].
    /// Given CG is stored as well.
    pub fn correct_altitude(
        &mut self,
        cg_m: Option<f64>,
        enable_drag_to_ground: bool,
    ) -> AltitudeCorrection {
        let (altitude, correction) = self.corrected_altitude(cg_m, enable_drag_to_ground);
        if let Some(altitude) = altitude {
            self.set_altitude(altitude);
        }
        self.set_cg_m(cg_m);
        correction
    }
}

#[cfg(test)]
mod test {
    use super::AltitudeCorrection;
    use crate::{
        constants::FT_TO_M,
        prelude::{
            AircraftSituation, Altitude, ElevationPlane, GndElevationInfo, IsOnGround,
            OnGroundDetails,
        },
        tests::situation_at,
    };
    use rstest::*;

    const ELEVATION_M: f64 = 500.0;
    const CG_M: f64 = 3.0;

    fn above_ground(above_m: f64) -> AircraftSituation {
        let alt_ft = (ELEVATION_M + CG_M + above_m) / FT_TO_M;
        let mut s = situation_at("EZY1", 0.0, 45.0, 5.0, alt_ft);
        let plane = ElevationPlane::single_point(s.position().unwrap(), ELEVATION_M);
        s.set_ground_elevation(Some(plane), GndElevationInfo::FromProvider, false);
        s
    }

    #[rstest]
    #[case(-5.0)]
    #[case(-0.01)]
    #[case(-300.0)]
    fn underflow(#[case] above_m: f64) {
        let s = above_ground(above_m);
        let (altitude, correction) = s.corrected_altitude(Some(CG_M), false);
        assert_eq!(correction, AltitudeCorrection::Underflow);
        assert!((altitude.unwrap().value_m - (ELEVATION_M + CG_M)).abs() < 1.0E-9);
    }

    #[test]
    fn near_ground_is_kept() {
        let s = above_ground(0.2);
        let (altitude, correction) = s.corrected_altitude(Some(CG_M), true);
        assert_eq!(correction, AltitudeCorrection::NoCorrection);
        assert_eq!(altitude, s.altitude());
    }

    #[rstest]
    #[case(OnGroundDetails::InFromNetwork, true)]
    #[case(OnGroundDetails::InFromParts, true)]
    #[case(OnGroundDetails::ByGuessing, true)]
    #[case(OnGroundDetails::ByElevation, false)]
    #[case(OnGroundDetails::ByInterpolation, false)]
    fn drag_to_ground(#[case] details: OnGroundDetails, #[case] dragged: bool) {
        let mut s = above_ground(10.0);
        s.set_on_ground(IsOnGround::OnGround, details);

        let correction = s.clone().correct_altitude(Some(CG_M), false);
        assert_eq!(correction, AltitudeCorrection::NoCorrection);

        let correction = s.correct_altitude(Some(CG_M), true);
        if dragged {
            assert_eq!(correction, AltitudeCorrection::DraggedToGround);
            assert!((s.altitude().unwrap().value_m - (ELEVATION_M + CG_M)).abs() < 1.0E-9);
        } else {
            assert_eq!(correction, AltitudeCorrection::NoCorrection);
        }
        assert_eq!(s.cg_m(), Some(CG_M));
    }

    #[test]
    fn missing_elevation() {
        let s = situation_at("EZY1", 0.0, 45.0, 5.0, 100.0);
        let (_, correction) = s.corrected_altitude(Some(CG_M), true);
        assert_eq!(correction, AltitudeCorrection::NoElevation);
    }

    #[test]
    fn agl_passes_through() {
        let mut s = above_ground(-50.0);
        s.set_altitude(Altitude::agl_m(10.0));
        let (altitude, correction) = s.corrected_altitude(Some(CG_M), true);
        assert_eq!(correction, AltitudeCorrection::Agl);
        assert_eq!(altitude, Some(Altitude::agl_m(10.0)));
        assert!(!correction.is_corrected());
    }
}
