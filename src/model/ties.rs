use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::check_week;
use crate::error::PickemError;

/// Per-week set of team abbreviations whose games ended in a tie under league
/// rules. Picks on these teams count as neither correct nor incorrect.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "BTreeMap<String, Vec<String>>")]
pub struct TieConfig {
    weeks: BTreeMap<u8, BTreeSet<String>>,
}

impl TieConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Will return `Err` if `week` is not a regular-season week.
    pub fn with_ties<I, S>(mut self, week: u32, teams: I) -> Result<Self, PickemError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let week = check_week(week)?;
        let set = self.weeks.entry(week).or_default();
        set.extend(teams.into_iter().map(|t| t.as_ref().trim().to_uppercase()));
        Ok(self)
    }

    #[must_use]
    pub fn is_tie(&self, week: u8, abbr: &str) -> bool {
        self.weeks
            .get(&week)
            .is_some_and(|set| set.contains(&abbr.trim().to_uppercase()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.values().all(BTreeSet::is_empty)
    }

    /// # Errors
    ///
    /// Will return `Err` if the file is unreadable, is not a json object of
    /// week → abbreviations, or names a week outside the season.
    pub fn from_json_file(path: &Path) -> Result<Self, PickemError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// # Errors
    ///
    /// Will return `Err` if the json is malformed or names an invalid week.
    pub fn from_json_str(json: &str) -> Result<Self, PickemError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TieConfig {
    type Error = PickemError;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        raw.into_iter().try_fold(Self::new(), |config, (week, teams)| {
            let week = week
                .trim()
                .parse::<u32>()
                .map_err(|e| PickemError::Config(format!("bad week key '{week}': {e}")))?;
            config.with_ties(week, teams)
        })
    }
}
