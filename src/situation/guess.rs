use crate::{
    aircraft::AircraftModel,
    constants::{
        DEFAULT_ROTATE_SPEED_KTS, EXTREME_BANK_DEG, EXTREME_PITCH_DEG, ROTATE_SPEED_DISQUALIFIER,
    },
    situation::{AircraftSituation, AircraftSituationChange, IsOnGround, OnGroundDetails},
};

impl AircraftSituation {
    fn set_guessed(&mut self, on_ground: IsOnGround, details: &str) -> bool {
        self.set_on_ground(on_ground, OnGroundDetails::ByGuessing);
        self.set_guessing_details(details);
        true
    }

    /// Guesses the on ground flag, when no authoritative (network or parts)
    /// information is available. First matching rule wins:
    ///
    /// 1. extreme pitch or bank: not on ground
    /// 2. pushback or not moving (fixed wing): on ground
    /// 3. faster than 1.25 x rotate speed: not on ground
    /// 4. ground distance (+ CG) underflow: on ground
    /// 5. trend: rotating up, constantly on ground or constantly ascending
    /// 6. VTOL: unknown
    /// 7. slower than rotate speed: on ground
    /// 8. otherwise: not on ground
    ///
    /// Returns true if a guess has been stored.
    pub fn guess_on_ground(
        &mut self,
        change: &AircraftSituationChange,
        model: Option<&AircraftModel>,
    ) -> bool {
        if !self.should_guess_on_ground() || self.is_null() {
            return false;
        }

        let vtol = model.map(|m| m.is_vtol()).unwrap_or(false);
        let rotate_speed_kts = match model {
            Some(model) if model.guessed_rotate_speed_kts() > 0.0 => {
                model.guessed_rotate_speed_kts()
            },
            _ => DEFAULT_ROTATE_SPEED_KTS,
        };
        let cg_m = self
            .cg_m()
            .or_else(|| model.map(|m| m.cg_or_guessed_m()));

        if self.pitch_deg().abs() > EXTREME_PITCH_DEG {
            return self.set_guessed(IsOnGround::NotOnGround, "extreme pitch");
        }
        if self.bank_deg().abs() > EXTREME_BANK_DEG {
            return self.set_guessed(IsOnGround::NotOnGround, "extreme bank");
        }

        if !vtol {
            if self.ground_speed_kts < 0.0 || change.contains_pushback() {
                return self.set_guessed(IsOnGround::OnGround, "pushback");
            }
            if !self.is_moving() {
                return self.set_guessed(IsOnGround::OnGround, "not moving");
            }
        }

        if self.ground_speed_kts > ROTATE_SPEED_DISQUALIFIER * rotate_speed_kts {
            return self.set_guessed(IsOnGround::NotOnGround, "faster than rotate speed");
        }

        if self.is_on_ground_by_elevation(cg_m) == IsOnGround::OnGround {
            let details = if cg_m.is_some() {
                OnGroundDetails::ByElevationAndCG
            } else {
                OnGroundDetails::ByElevation
            };
            self.set_on_ground(IsOnGround::OnGround, details);
            self.set_guessing_details("elevation underflow");
            return true;
        }

        if !change.is_null() {
            if change.is_const_on_ground() {
                if change.is_rotating_up() {
                    return self.set_guessed(IsOnGround::NotOnGround, "rotating up");
                }
                return self.set_guessed(IsOnGround::OnGround, "waiting for rotation");
            }
            if change.is_const_ascending() {
                return self.set_guessed(IsOnGround::NotOnGround, "ascending");
            }
        }

        if vtol {
            self.set_on_ground(IsOnGround::Unknown, OnGroundDetails::NotSet);
            self.set_guessing_details("VTOL, no guess");
            return false;
        }

        if self.ground_speed_kts < rotate_speed_kts {
            return self.set_guessed(IsOnGround::OnGround, "slower than rotate speed");
        }
        self.set_guessed(IsOnGround::NotOnGround, "fallback")
    }
}
