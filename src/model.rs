pub mod ledger;
pub mod participant;
pub mod pick;
pub mod score;
pub mod teams;
pub mod ties;

use std::ops::RangeInclusive;

use crate::error::PickemError;

pub use ledger::{ExtractedPage, Ledger};
pub use participant::{Participant, WeeklyTally};
pub use pick::{Pick, PickOutcome};
pub use score::{RankedTotal, ScoreData};
pub use teams::team_abbr;
pub use ties::TieConfig;

pub const FIRST_WEEK: u8 = 1;
pub const LAST_WEEK: u8 = 18;
pub const WEEKS_IN_SEASON: usize = LAST_WEEK as usize;

#[must_use]
pub fn season_weeks() -> RangeInclusive<u8> {
    FIRST_WEEK..=LAST_WEEK
}

/// # Errors
///
/// Will return `Err` if `week` is not a regular-season week.
pub fn check_week(week: u32) -> Result<u8, PickemError> {
    u8::try_from(week)
        .ok()
        .filter(|w| season_weeks().contains(w))
        .ok_or(PickemError::InvalidWeek(week))
}
