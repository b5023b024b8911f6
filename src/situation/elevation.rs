#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        ALLOWED_ALTITUDE_DEVIATION_FT, FT_TO_M, MAX_DELTA_ELEVATION_FT, SINGLE_POINT_RADIUS_M,
        SKIP_NEAR_GROUND_HEIGHT_M, SKIP_NEAR_GROUND_SPEED_KTS,
    },
    geo::ElevationPlane,
    situation::{AircraftSituation, AircraftSituationChange},
};

/// Provenance of a ground elevation.
/// Variants are ranked by confidence: a later variant is better information.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GndElevationInfo {
    #[default]
    NoElevationInfo,
    /// Unit tests
    Test,
    /// Reused from an older situation with constant trend
    Extrapolated,
    /// Interpolated between two situations
    Interpolated,
    /// Cached elevation close by
    FromCache,
    /// Derived from the situation change (mean of stable elevations)
    SituationChange,
    /// Provided by the simulator elevation provider
    FromProvider,
}

impl std::fmt::Display for GndElevationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoElevationInfo => write!(f, "no info"),
            Self::Test => write!(f, "test"),
            Self::Extrapolated => write!(f, "extrapolated"),
            Self::Interpolated => write!(f, "interpolated"),
            Self::FromCache => write!(f, "from cache"),
            Self::SituationChange => write!(f, "situation change"),
            Self::FromProvider => write!(f, "from provider"),
        }
    }
}

impl AircraftSituation {
    pub fn has_ground_elevation(&self) -> bool {
        self.ground_elevation.is_some()
    }

    /// Ground [ElevationPlane], when known
    pub fn ground_elevation(&self) -> Option<&ElevationPlane> {
        self.ground_elevation.as_ref()
    }

    /// Ground elevation [m], when known
    pub fn ground_elevation_m(&self) -> Option<f64> {
        self.ground_elevation.map(|plane| plane.elevation_m)
    }

    pub fn ground_elevation_info(&self) -> GndElevationInfo {
        self.elevation_info
    }

    /// Elevation has been transferred from another situation
    pub fn is_elevation_info_transferred(&self) -> bool {
        self.elevation_transferred
    }

    /// Elevation information `other` would be better than the current one.
    /// Ranking is by [GndElevationInfo] order, and on equal rank,
    /// "not transferred" is better than "transferred".
    pub fn is_other_elevation_info_better(
        &self,
        other: GndElevationInfo,
        transferred: bool,
    ) -> bool {
        if matches!(
            other,
            GndElevationInfo::NoElevationInfo | GndElevationInfo::Test
        ) {
            return false;
        }
        if other > self.elevation_info {
            return true;
        }
        if other == self.elevation_info {
            if self.elevation_transferred == transferred {
                return false;
            }
            return !transferred;
        }
        false
    }

    /// Sets (or clears) the ground elevation unconditionally.
    /// Returns true if the stored values changed.
    pub fn set_ground_elevation(
        &mut self,
        plane: Option<ElevationPlane>,
        info: GndElevationInfo,
        transferred: bool,
    ) -> bool {
        let (info, transferred) = match plane {
            Some(_) => (info, transferred),
            None => (GndElevationInfo::NoElevationInfo, false),
        };
        let changed = self.ground_elevation != plane
            || self.elevation_info != info
            || self.elevation_transferred != transferred;
        self.ground_elevation = plane;
        self.elevation_info = info;
        self.elevation_transferred = transferred;
        changed
    }

    /// Sets the ground elevation if this situation lies within the radius of `plane`,
    /// and the new information is better than the current one
    /// (or no elevation is currently stored).
    pub fn set_ground_elevation_checked(
        &mut self,
        plane: &ElevationPlane,
        info: GndElevationInfo,
        transferred: bool,
    ) -> bool {
        let Some(position) = self.position() else {
            return false;
        };
        if !plane.is_within_range(position) {
            return false;
        }
        if self.ground_elevation.is_none() || self.is_other_elevation_info_better(info, transferred)
        {
            return self.set_ground_elevation(Some(*plane), info, transferred);
        }
        false
    }

    /// Copies the ground elevation of `from` if both situations are within `radius_m`.
    pub fn transfer_ground_elevation_to_me(
        &mut self,
        from: &AircraftSituation,
        radius_m: f64,
        transferred: bool,
    ) -> bool {
        let Some(plane) = from.ground_elevation else {
            return false;
        };
        match self.distance_m(from) {
            Some(distance_m) if distance_m <= radius_m => {
                self.set_ground_elevation(Some(plane), from.elevation_info, transferred)
            },
            _ => false,
        }
    }

    /// Copies the ground elevation of `from`, only if both situations share the same position.
    pub fn transfer_ground_elevation_from_same_position(
        &mut self,
        from: &AircraftSituation,
    ) -> bool {
        if !self.equal_normal_vector(from) {
            return false;
        }
        self.transfer_ground_elevation_to_me(from, f64::INFINITY, true)
    }

    /// Interpolated [ElevationPlane] between an old and a new situation.
    ///
    /// - both situations need an elevation, and the elevations may not differ
    ///   by more than a sanity threshold (larger jumps are implausible)
    /// - if `query` is given, the elevation is blended by distance ratio
    ///   along the old/new path, and snapped to the closer situation near the ends
    /// - otherwise, the mean elevation is returned
    ///
    /// `snap_distance_m`: within this distance of old or new, their elevation is used as is.
    pub fn interpolated_elevation(
        query: Option<&AircraftSituation>,
        old: &AircraftSituation,
        new: &AircraftSituation,
        snap_distance_m: Option<f64>,
    ) -> Option<ElevationPlane> {
        let old_plane = old.ground_elevation?;
        let new_plane = new.ground_elevation?;
        let new_position = new.position()?;
        old.position()?;

        if old.equal_normal_vector(new) {
            return Some(new_plane);
        }

        let new_elv_ft = new_plane.elevation_ft();
        let old_elv_ft = old_plane.elevation_ft();
        let delta_elv_ft = new_elv_ft - old_elv_ft;
        if delta_elv_ft.abs() > MAX_DELTA_ELEVATION_FT {
            return None;
        }

        let Some(query) = query.filter(|q| !q.is_null()) else {
            let elv_ft = 0.5 * (old_elv_ft + new_elv_ft);
            return Some(ElevationPlane::single_point(new_position, elv_ft * FT_TO_M));
        };

        let distance_new_m = query.distance_m(new)?;
        let distance_old_m = query.distance_m(old)?;
        if let Some(snap_m) = snap_distance_m {
            if distance_new_m < snap_m {
                return Some(new_plane);
            }
            if distance_old_m < snap_m {
                return Some(old_plane);
            }
        }
        if distance_new_m < 5.0 {
            return Some(new_plane);
        }

        let distance_old_new_m = new.distance_m(old)?;
        if distance_old_new_m < 5.0 {
            return Some(old_plane);
        }

        let ratio = distance_new_m / distance_old_new_m;
        if ratio < 0.05 {
            return Some(new_plane);
        }
        if ratio > 0.95 {
            return Some(old_plane);
        }

        let elv_ft = new_elv_ft - ratio * delta_elv_ft;
        Some(ElevationPlane::single_point(
            query.position()?,
            elv_ft * FT_TO_M,
        ))
    }

    /// Sets the elevation interpolated between old and new at this situation's position.
    pub fn interpolate_elevation(
        &mut self,
        old: &AircraftSituation,
        new: &AircraftSituation,
    ) -> bool {
        match Self::interpolated_elevation(Some(self), old, new, None) {
            Some(plane) => {
                self.set_ground_elevation(Some(plane), GndElevationInfo::Interpolated, false);
                true
            },
            None => false,
        }
    }

    /// Reuses the elevation of the `older` situation when the recent trend shows an aircraft
    /// constantly on ground, with stable altitudes and elevations.
    /// Never overrides an existing elevation.
    pub fn extrapolate_elevation(
        &mut self,
        newer: &AircraftSituation,
        older: &AircraftSituation,
        change: &AircraftSituationChange,
    ) -> bool {
        if self.has_ground_elevation() || newer.is_null() || older.is_null() || change.is_null() {
            return false;
        }
        let Some(plane) = older.ground_elevation else {
            return false;
        };
        if !(change.is_const_on_ground()
            && change.has_altitude_dev_within_allowed_range()
            && change.has_elevation_dev_within_allowed_range())
        {
            return false;
        }
        let (Some(newer_alt), Some(older_alt)) = (newer.altitude(), older.altitude()) else {
            return false;
        };
        if (newer_alt.ft() - older_alt.ft()).abs() > ALLOWED_ALTITUDE_DEVIATION_FT {
            return false;
        }
        self.set_ground_elevation(Some(plane), GndElevationInfo::Extrapolated, false)
    }

    /// Ground reasoning is very likely irrelevant for this situation:
    /// fast or high above ground, and no authoritative "on ground" information.
    pub fn can_likely_skip_near_ground_interpolation(&self) -> bool {
        if self.is_on_ground() && self.has_inbound_ground_details() {
            return false;
        }
        if self.is_null() {
            return true;
        }
        if self.ground_speed_kts > SKIP_NEAR_GROUND_SPEED_KTS {
            return true;
        }
        matches!(
            self.height_above_ground_m(),
            Some(height_m) if height_m >= SKIP_NEAR_GROUND_HEIGHT_M
        )
    }

    /// Radius [m] used to look for a transferable elevation close to this situation
    pub(crate) fn elevation_search_radius_m(&self) -> f64 {
        self.distance_per_250ms_m().max(SINGLE_POINT_RADIUS_M)
    }
}
