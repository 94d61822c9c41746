use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RankedTotal {
    pub rank: usize,
    pub name: String,
    pub total: i32,
}

/// Everything the report template needs. Weekly vectors are indexed by
/// `week - 1` and always hold a full season.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreData {
    pub rankings: Vec<RankedTotal>,
    pub weekly_scores: BTreeMap<String, Vec<i32>>,
    pub weekly_records: BTreeMap<String, Vec<String>>,
}

impl ScoreData {
    #[must_use]
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.rankings.iter().find(|r| r.name == name).map(|r| r.rank)
    }

    #[must_use]
    pub fn total_of(&self, name: &str) -> Option<i32> {
        self.rankings.iter().find(|r| r.name == name).map(|r| r.total)
    }
}
