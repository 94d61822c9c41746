use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::pick::{Pick, PickOutcome};
use super::{check_week, season_weeks};
use crate::error::PickemError;

pub const DEFAULT_OWNER: &str = "owner";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeeklyTally {
    pub correct: usize,
    pub incorrect: usize,
    pub ties: usize,
    pub pushes: usize,
}

impl WeeklyTally {
    #[must_use]
    pub fn from_picks(picks: &[Pick]) -> Self {
        picks.iter().fold(Self::default(), |mut tally, pick| {
            match pick.outcome() {
                PickOutcome::Correct => tally.correct += 1,
                PickOutcome::Incorrect => tally.incorrect += 1,
                PickOutcome::Tie => tally.ties += 1,
                PickOutcome::Push => tally.pushes += 1,
            }
            tally
        })
    }

    /// One point per correct pick, minus two per incorrect pick.
    #[must_use]
    pub fn score(&self) -> i32 {
        let correct = i32::try_from(self.correct).unwrap_or(i32::MAX);
        let incorrect = i32::try_from(self.incorrect).unwrap_or(i32::MAX / 2);
        correct - 2 * incorrect
    }

    #[must_use]
    pub fn record(&self) -> String {
        format!("({}-{}-{})", self.correct, self.incorrect, self.ties)
    }
}

/// One contest entry. Every regular-season week is present from creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    name: String,
    owner: String,
    weeks_to_picks: BTreeMap<u8, Vec<Pick>>,
}

impl Participant {
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            weeks_to_picks: season_weeks().map(|week| (week, Vec::new())).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// # Errors
    ///
    /// Will return `Err` if `week` is not a regular-season week.
    pub fn add_weekly_pick(&mut self, week: u8, pick: Pick) -> Result<(), PickemError> {
        self.add_weekly_picks(week, std::iter::once(pick))
    }

    /// # Errors
    ///
    /// Will return `Err` if `week` is not a regular-season week.
    pub fn add_weekly_picks(
        &mut self,
        week: u8,
        picks: impl IntoIterator<Item = Pick>,
    ) -> Result<(), PickemError> {
        let week = check_week(u32::from(week))?;
        self.weeks_to_picks.entry(week).or_default().extend(picks);
        Ok(())
    }

    /// Empty for weeks with no data and for weeks outside the season.
    #[must_use]
    pub fn weekly_picks(&self, week: u8) -> &[Pick] {
        self.weeks_to_picks.get(&week).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn weekly_tally(&self, week: u8) -> WeeklyTally {
        WeeklyTally::from_picks(self.weekly_picks(week))
    }

    #[must_use]
    pub fn weekly_num_correct(&self, week: u8) -> usize {
        self.weekly_tally(week).correct
    }

    #[must_use]
    pub fn weekly_num_incorrect(&self, week: u8) -> usize {
        self.weekly_tally(week).incorrect
    }

    #[must_use]
    pub fn weekly_num_ties(&self, week: u8) -> usize {
        self.weekly_tally(week).ties
    }

    #[must_use]
    pub fn weekly_score(&self, week: u8) -> i32 {
        self.weekly_tally(week).score()
    }

    #[must_use]
    pub fn weekly_record(&self, week: u8) -> String {
        self.weekly_tally(week).record()
    }

    #[must_use]
    pub fn season_total(&self) -> i32 {
        season_weeks().map(|week| self.weekly_score(week)).sum()
    }
}
