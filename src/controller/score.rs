use std::collections::BTreeMap;

use crate::model::{Ledger, Participant, RankedTotal, ScoreData, season_weeks};

/// Weekly scores, weekly records and the ranked season totals for everyone in
/// `participants`. The input order does not matter.
#[must_use]
pub fn build_score_data(participants: &[Participant]) -> ScoreData {
    let mut weekly_scores: BTreeMap<String, Vec<i32>> = BTreeMap::new();
    let mut weekly_records: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut totals: Vec<(String, i32)> = Vec::with_capacity(participants.len());

    for participant in participants {
        let name = participant.name().to_string();
        let (scores, records): (Vec<i32>, Vec<String>) = season_weeks()
            .map(|week| {
                let tally = participant.weekly_tally(week);
                (tally.score(), tally.record())
            })
            .unzip();

        totals.push((name.clone(), scores.iter().sum()));
        weekly_scores.insert(name.clone(), scores);
        weekly_records.insert(name, records);
    }

    ScoreData {
        rankings: rank_totals(totals),
        weekly_scores,
        weekly_records,
    }
}

/// Highest total first, names breaking ties in the ordering. Equal totals
/// share a rank and the next distinct total skips ahead: 10, 10, 7 ranks
/// 1, 1, 3.
#[must_use]
pub fn rank_totals(mut totals: Vec<(String, i32)>) -> Vec<RankedTotal> {
    totals.sort_by(|(a_name, a_total), (b_name, b_total)| {
        b_total.cmp(a_total).then_with(|| a_name.cmp(b_name))
    });

    let mut rankings: Vec<RankedTotal> = Vec::with_capacity(totals.len());
    for (i, (name, total)) in totals.into_iter().enumerate() {
        let rank = match rankings.last() {
            Some(prev) if prev.total == total => prev.rank,
            _ => i + 1,
        };
        rankings.push(RankedTotal { rank, name, total });
    }
    rankings
}

#[must_use]
pub fn score_ledger(ledger: &Ledger) -> ScoreData {
    build_score_data(&ledger.participants())
}
