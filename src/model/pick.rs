use serde::{Deserialize, Serialize};
use std::fmt;

use super::teams::team_abbr;
use super::ties::TieConfig;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickOutcome {
    Correct,
    Incorrect,
    /// No official result yet (postponed, in progress).
    Push,
    /// League-rule tie from the tie configuration.
    Tie,
}

impl PickOutcome {
    /// Tie overrides whatever marker the grid showed.
    #[must_use]
    pub fn classify(correct_marker: bool, incorrect_marker: bool, is_tie: bool) -> Self {
        if is_tie {
            Self::Tie
        } else if correct_marker {
            Self::Correct
        } else if incorrect_marker {
            Self::Incorrect
        } else {
            Self::Push
        }
    }
}

impl fmt::Display for PickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PickOutcome::Correct => "correct",
            PickOutcome::Incorrect => "incorrect",
            PickOutcome::Push => "push",
            PickOutcome::Tie => "tie",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Pick {
    team_picked: String,
    outcome: PickOutcome,
}

impl Pick {
    #[must_use]
    pub fn new(team_picked: impl Into<String>, outcome: PickOutcome) -> Self {
        Self {
            team_picked: team_picked.into(),
            outcome,
        }
    }

    /// Builds a pick from the markers found in one grid cell, applying the
    /// tie table for `week`.
    #[must_use]
    pub fn from_markers(
        team_picked: &str,
        correct_marker: bool,
        incorrect_marker: bool,
        week: u8,
        ties: &TieConfig,
    ) -> Self {
        let is_tie = ties.is_tie(week, &team_abbr(team_picked));
        Self::new(
            team_picked.trim(),
            PickOutcome::classify(correct_marker, incorrect_marker, is_tie),
        )
    }

    #[must_use]
    pub fn team_picked(&self) -> &str {
        &self.team_picked
    }

    #[must_use]
    pub fn outcome(&self) -> PickOutcome {
        self.outcome
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.outcome == PickOutcome::Correct
    }

    #[must_use]
    pub fn is_incorrect(&self) -> bool {
        self.outcome == PickOutcome::Incorrect
    }

    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.outcome == PickOutcome::Tie
    }

    #[must_use]
    pub fn is_push(&self) -> bool {
        self.outcome == PickOutcome::Push
    }
}
