use crate::{aircraft::AircraftParts, situation::AircraftSituation};

/// Diagnostic status of one situation interpolation
#[derive(Default, Debug, Clone, PartialEq)]
pub struct InterpolationStatus {
    interpolated: bool,
    same_situation: bool,
    valid_situation: bool,
    situations_count: usize,
    extra_info: String,
}

impl InterpolationStatus {
    /// Interpolation succeeded
    pub fn is_interpolated(&self) -> bool {
        self.interpolated
    }

    /// Situation is a repeat of the last valid one
    pub fn is_same_situation(&self) -> bool {
        self.same_situation
    }

    /// The returned situation is a valid one: freshly interpolated,
    /// or the last valid one repeated
    pub fn has_valid_situation(&self) -> bool {
        self.valid_situation
    }

    /// Number of situations the interpolation has been formed from
    pub fn situations_count(&self) -> usize {
        self.situations_count
    }

    pub fn extra_info(&self) -> &str {
        &self.extra_info
    }

    /// Interpolated, and the result differs from the previous one
    pub fn is_interpolated_and_changed(&self) -> bool {
        self.interpolated && !self.same_situation
    }

    pub(crate) fn set_interpolated(&mut self, interpolated: bool) {
        self.interpolated = interpolated;
    }

    pub(crate) fn set_same_situation(&mut self, same: bool) {
        self.same_situation = same;
    }

    pub(crate) fn set_valid_situation(&mut self, valid: bool) {
        self.valid_situation = valid;
    }

    pub(crate) fn set_situations_count(&mut self, count: usize) {
        self.situations_count = count;
    }

    pub(crate) fn set_extra_info(&mut self, info: &str) {
        self.extra_info = info.to_string();
    }
}

impl std::fmt::Display for InterpolationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "interpolated: {} same: {} valid: {} situations: {}",
            self.interpolated, self.same_situation, self.valid_situation, self.situations_count
        )?;
        if !self.extra_info.is_empty() {
            write!(f, " ({})", self.extra_info)?;
        }
        Ok(())
    }
}

/// Diagnostic status of one parts interpolation
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartsStatus {
    supports_parts: bool,
    reused_parts: bool,
    same_parts: bool,
}

impl PartsStatus {
    /// Parts are provided by the network
    pub fn is_supporting_parts(&self) -> bool {
        self.supports_parts
    }

    /// Parts of a previous call have been reused
    pub fn is_reused_parts(&self) -> bool {
        self.reused_parts
    }

    /// Parts did not change since the previous call
    pub fn is_same_parts(&self) -> bool {
        self.same_parts
    }

    pub(crate) fn set_supporting_parts(&mut self, supports: bool) {
        self.supports_parts = supports;
    }

    pub(crate) fn set_reused_parts(&mut self, reused: bool) {
        self.reused_parts = reused;
    }

    pub(crate) fn set_same_parts(&mut self, same: bool) {
        self.same_parts = same;
    }
}

impl std::fmt::Display for PartsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "supports parts: {} reused: {} same: {}",
            self.supports_parts, self.reused_parts, self.same_parts
        )
    }
}

/// [InterpolationResult] of one call to [crate::prelude::Interpolator::get_interpolation]
#[derive(Default, Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    /// Interpolated situation. Null when no situation has ever been available.
    pub situation: AircraftSituation,
    /// Interpolated or guessed parts, when enabled
    pub parts: Option<AircraftParts>,
    /// [InterpolationStatus]
    pub interpolation_status: InterpolationStatus,
    /// [PartsStatus]
    pub parts_status: PartsStatus,
}

#[cfg(test)]
mod test {
    use super::{InterpolationStatus, PartsStatus};

    #[test]
    fn status_display() {
        let mut status = InterpolationStatus::default();
        assert!(!status.is_interpolated());
        assert!(!status.has_valid_situation());
        status.set_interpolated(true);
        status.set_valid_situation(true);
        status.set_situations_count(3);
        assert!(status.is_interpolated_and_changed());
        status.set_extra_info("no situations");
        assert_eq!(
            status.to_string(),
            "interpolated: true same: false valid: true situations: 3 (no situations)"
        );

        let mut parts = PartsStatus::default();
        parts.set_reused_parts(true);
        assert_eq!(
            parts.to_string(),
            "supports parts: false reused: true same: false"
        );
    }
}
