use crate::{geo::normalize_deg_180, situation::AircraftSituation};

/// Pitch, bank, heading and ground speed interpolated between two situations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pbh {
    /// Fraction of the time elapsed between old and new, within [0, 1]
    pub fraction: f64,
    old: [f64; 4],
    new: [f64; 4],
}

/// Shortest angular difference `to - from` [deg], within ]-180, 180]
fn angular_difference_deg(from_deg: f64, to_deg: f64) -> f64 {
    normalize_deg_180(to_deg - from_deg)
}

impl Pbh {
    pub fn new(fraction: f64, old: &AircraftSituation, new: &AircraftSituation) -> Self {
        let values = |s: &AircraftSituation| {
            [s.pitch_deg(), s.bank_deg(), s.heading_deg(), s.ground_speed_kts]
        };
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            old: values(old),
            new: values(new),
        }
    }

    fn angle_deg(&self, index: usize) -> f64 {
        let (old, new) = (self.old[index], self.new[index]);
        normalize_deg_180(old + angular_difference_deg(old, new) * self.fraction)
    }

    /// Pitch [deg]
    pub fn pitch_deg(&self) -> f64 {
        self.angle_deg(0)
    }

    /// Bank [deg]
    pub fn bank_deg(&self) -> f64 {
        self.angle_deg(1)
    }

    /// Heading [deg], turning the shortest way
    pub fn heading_deg(&self) -> f64 {
        self.angle_deg(2)
    }

    /// Ground speed [kt]
    pub fn ground_speed_kts(&self) -> f64 {
        self.old[3] + (self.new[3] - self.old[3]) * self.fraction
    }
}

#[cfg(test)]
mod test {
    use super::Pbh;
    use crate::tests::situation_at;
    use rstest::*;

    #[rstest]
    #[case(350.0, 10.0, 0.5, 0.0)]
    #[case(10.0, 350.0, 0.5, 0.0)]
    #[case(170.0, -170.0, 0.5, 180.0)]
    #[case(0.0, 90.0, 0.25, 22.5)]
    #[case(0.0, 90.0, 2.0, 90.0)]
    fn heading_shortest_way(
        #[case] old_deg: f64,
        #[case] new_deg: f64,
        #[case] fraction: f64,
        #[case] expected: f64,
    ) {
        let old = situation_at("UAE1", 0.0, 25.0, 55.0, 1000.0).with_pbh(0.0, 0.0, old_deg);
        let new = situation_at("UAE1", 5.0, 25.0, 55.0, 1000.0).with_pbh(0.0, 0.0, new_deg);
        let pbh = Pbh::new(fraction, &old, &new);
        assert!(
            (pbh.heading_deg() - expected).abs() < 1.0E-9,
            "{} -> {}: {}",
            old_deg,
            new_deg,
            pbh.heading_deg()
        );
    }

    #[test]
    fn pitch_bank_speed() {
        let old = situation_at("UAE1", 0.0, 25.0, 55.0, 1000.0)
            .with_pbh(2.0, -10.0, 0.0)
            .with_ground_speed_kts(140.0);
        let new = situation_at("UAE1", 5.0, 25.0, 55.0, 1000.0)
            .with_pbh(10.0, 10.0, 0.0)
            .with_ground_speed_kts(160.0);
        let pbh = Pbh::new(0.5, &old, &new);
        assert!((pbh.pitch_deg() - 6.0).abs() < 1.0E-9);
        assert!(pbh.bank_deg().abs() < 1.0E-9);
        assert!((pbh.ground_speed_kts() - 150.0).abs() < 1.0E-9);
    }
}
