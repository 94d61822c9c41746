use regex::Regex;
use scraper::Html;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{info, warn};

use super::extract::selector;
use crate::error::PickemError;
use crate::model::ScoreData;

static APOSTROPHES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("[\u{2018}\u{2019}\u{2032}`\u{00B4}]").ok());
static NOT_NAME_CHARS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s']").ok());

/// Key used to match the same entry across both scoreboards: apostrophe
/// variants folded to `'`, other punctuation dropped, lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut key = name.to_string();
    if let Some(re) = APOSTROPHES.as_ref() {
        key = re.replace_all(&key, "'").into_owned();
    }
    if let Some(re) = NOT_NAME_CHARS.as_ref() {
        key = re.replace_all(&key, "").into_owned();
    }
    key.to_lowercase()
}

/// ESPN's season total for a `wins-losses` record, scored like ours.
#[must_use]
pub fn record_score(record: &str) -> Option<i32> {
    let (wins, losses) = record.trim().split_once('-')?;
    let wins: i32 = wins.trim().parse().ok()?;
    let losses: i32 = losses.trim().parse().ok()?;
    Some(wins - 2 * losses)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    MissingFromOurs {
        espn_name: String,
        espn: i32,
    },
    MissingFromEspn {
        our_name: String,
        ours: i32,
    },
    ScoreMismatch {
        our_name: String,
        espn_name: String,
        ours: i32,
        espn: i32,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::MissingFromOurs { espn_name, espn } => {
                write!(f, "'{espn_name}' ({espn}) is on ESPN but not in our scoreboard")
            }
            Difference::MissingFromEspn { our_name, ours } => {
                write!(f, "'{our_name}' ({ours}) is in our scoreboard but not on ESPN")
            }
            Difference::ScoreMismatch {
                our_name,
                espn_name,
                ours,
                espn,
            } => write!(
                f,
                "'{our_name}' (ours) / '{espn_name}' (ESPN) differ: ours = {ours}, ESPN = {espn}"
            ),
        }
    }
}

fn by_key(totals: &BTreeMap<String, i32>) -> BTreeMap<String, (&str, i32)> {
    totals
        .iter()
        .map(|(name, total)| (normalize_name(name), (name.as_str(), *total)))
        .collect()
}

/// Every entry whose total disagrees, or that only one side knows about.
/// Names are matched through [`normalize_name`]. Empty when the boards agree.
#[must_use]
pub fn compare_scoreboards(
    ours: &BTreeMap<String, i32>,
    espn: &BTreeMap<String, i32>,
) -> Vec<Difference> {
    let ours = by_key(ours);
    let espn = by_key(espn);
    let keys: BTreeSet<&String> = ours.keys().chain(espn.keys()).collect();

    keys.into_iter()
        .filter_map(|key| match (ours.get(key), espn.get(key)) {
            (Some(&(our_name, our_total)), Some(&(espn_name, espn_total))) => {
                (our_total != espn_total).then(|| Difference::ScoreMismatch {
                    our_name: our_name.to_string(),
                    espn_name: espn_name.to_string(),
                    ours: our_total,
                    espn: espn_total,
                })
            }
            (Some(&(our_name, our_total)), None) => Some(Difference::MissingFromEspn {
                our_name: our_name.to_string(),
                ours: our_total,
            }),
            (None, Some(&(espn_name, espn_total))) => Some(Difference::MissingFromOurs {
                espn_name: espn_name.to_string(),
                espn: espn_total,
            }),
            (None, None) => None,
        })
        .collect()
}

/// Season totals as they appear in the standings of our report.
#[must_use]
pub fn report_totals(data: &ScoreData) -> BTreeMap<String, i32> {
    data.rankings
        .iter()
        .map(|ranked| (ranked.name.clone(), ranked.total))
        .collect()
}

/// Reads the totals back out of a rendered report (`td.team_name` and
/// `td.overall_score` in the same row).
///
/// # Errors
///
/// Will return `Err` if a built-in selector fails to parse.
pub fn read_report_totals(html: &str) -> Result<BTreeMap<String, i32>, PickemError> {
    let row = selector("tr")?;
    let name_cell = selector("td.team_name")?;
    let score_cell = selector("td.overall_score")?;

    let document = Html::parse_document(html);
    let mut totals = BTreeMap::new();
    for tr in document.select(&row) {
        let (Some(name), Some(score)) = (
            tr.select(&name_cell).next(),
            tr.select(&score_cell).next(),
        ) else {
            continue;
        };
        let name = name.text().collect::<String>().trim().to_string();
        let score = score.text().collect::<String>();
        match score.trim().parse::<i32>() {
            Ok(total) => {
                totals.insert(name, total);
            }
            Err(_) => warn!(name = %name, "unreadable total {score:?} in report"),
        }
    }
    Ok(totals)
}

/// Reads one page of ESPN's group standings: the first table, header row
/// skipped, entry name in the second column, `W-L` record in the third.
///
/// # Errors
///
/// Will return `Err` if the page has no table.
pub fn read_espn_standings(html: &str) -> Result<BTreeMap<String, i32>, PickemError> {
    let table = selector("table")?;
    let row = selector("tr")?;
    let cell = selector("td")?;
    let link = selector("a")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table)
        .next()
        .ok_or_else(|| PickemError::Standings("no standings table on the page".to_string()))?;

    let mut totals = BTreeMap::new();
    for tr in table.select(&row).skip(1) {
        let cells: Vec<_> = tr.select(&cell).collect();
        if cells.is_empty() {
            continue;
        }
        let Some(name) = cells
            .get(1)
            .and_then(|td| td.select(&link).next())
            .map(|a| a.text().collect::<String>().trim().to_string())
        else {
            warn!("standings row without an entry link");
            continue;
        };
        let record = cells
            .get(2)
            .map(|td| td.text().collect::<String>())
            .unwrap_or_default();
        let Some(total) = record_score(&record) else {
            warn!(name = %name, "unreadable record {record:?}");
            continue;
        };
        totals.insert(name, total);
    }
    Ok(totals)
}

/// Compares `data` with saved ESPN standings pages and logs every
/// difference.
///
/// # Errors
///
/// Will return `Err` if a page cannot be read or has no standings table.
pub async fn compare_with_saved_standings(
    pages: &[PathBuf],
    data: &ScoreData,
) -> Result<Vec<Difference>, PickemError> {
    let mut espn = BTreeMap::new();
    for page in pages {
        let html = tokio::fs::read_to_string(page).await?;
        espn.extend(read_espn_standings(&html)?);
    }

    let differences = compare_scoreboards(&report_totals(data), &espn);
    if differences.is_empty() {
        info!(entries = espn.len(), "Scoreboards match ESPN standings");
    } else {
        warn!(count = differences.len(), "Scoreboards don't match ESPN standings");
        for difference in &differences {
            warn!("{difference}");
        }
    }
    Ok(differences)
}
