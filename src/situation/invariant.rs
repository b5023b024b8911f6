use itertools::Itertools;

use crate::{aircraft::Callsign, error::Error, situation::AircraftSituation};

/// Verifies the situation history of one aircraft, as expected from history providers:
/// - at most `max_situations` situations
/// - no null situation
/// - all situations belong to `callsign`
/// - sorted strictly latest first, by adjusted epoch
/// - CG, when known, is not negative
///
/// The interpolator checks this in debug builds only. Release builds do not verify,
/// and an invalid history leads to undefined (but non crashing) interpolation.
pub fn verify_situations(
    situations: &[AircraftSituation],
    callsign: &Callsign,
    max_situations: usize,
) -> Result<(), Error> {
    if situations.len() > max_situations {
        return Err(Error::TooManySituations(situations.len()));
    }

    for (index, situation) in situations.iter().enumerate() {
        if situation.is_null() {
            return Err(Error::NullPosition(index));
        }
        if situation.callsign != *callsign {
            return Err(Error::WrongCallsign {
                expected: callsign.clone(),
                found: situation.callsign.clone(),
            });
        }
        if let Some(cg_m) = situation.cg_m() {
            if cg_m < 0.0 {
                return Err(Error::NegativeCG(cg_m));
            }
        }
    }

    for (newer, older) in situations.iter().tuple_windows() {
        if !newer.is_newer_than_adjusted(older) {
            return Err(Error::UnsortedSituations(older.adjusted_epoch()));
        }
    }

    Ok(())
}
