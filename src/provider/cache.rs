use std::{collections::VecDeque, sync::RwLock};

use crate::{
    prelude::{AircraftSituation, ElevationPlane},
    provider::ElevationProvider,
};

/// Default number of [ElevationPlane]s kept by the [ElevationCache]
const DEFAULT_CAPACITY: usize = 1000;

/// [ElevationCache] is a bounded, thread safe collection of known ground elevations.
/// Oldest entries are evicted first.
pub struct ElevationCache {
    capacity: usize,
    planes: RwLock<VecDeque<ElevationPlane>>,
}

impl Default for ElevationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ElevationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            planes: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Stores a new [ElevationPlane]
    pub fn insert(&self, plane: ElevationPlane) {
        if let Ok(mut planes) = self.planes.write() {
            if planes.len() == self.capacity {
                planes.pop_front();
            }
            planes.push_back(plane);
        }
    }

    pub fn len(&self) -> usize {
        self.planes.read().map(|planes| planes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut planes) = self.planes.write() {
            planes.clear();
        }
    }
}

impl ElevationProvider for ElevationCache {
    fn find_closest_elevation_within_range(
        &self,
        situation: &AircraftSituation,
        range_m: f64,
    ) -> Option<ElevationPlane> {
        let position = situation.position()?;
        let planes = self.planes.read().ok()?;
        planes
            .iter()
            .map(|plane| (plane.distance_m(position), plane))
            .filter(|(distance_m, _)| *distance_m <= range_m)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, plane)| *plane)
    }
}
