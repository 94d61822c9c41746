mod common;

use std::collections::BTreeMap;

use chrono::{Local, TimeZone};
use common::temp_dir;
use rusty_pickem::args::validation::check_readable_file;
use rusty_pickem::controller::espn::{
    Difference, compare_scoreboards, compare_with_saved_standings, normalize_name,
    read_espn_standings, read_report_totals, record_score, report_totals,
};
use rusty_pickem::controller::score::build_score_data;
use rusty_pickem::error::PickemError;
use rusty_pickem::model::{Participant, Pick, PickOutcome, participant::DEFAULT_OWNER};
use rusty_pickem::view::score::render_scoreboard_page;

fn totals(entries: &[(&str, i32)]) -> BTreeMap<String, i32> {
    entries
        .iter()
        .map(|(name, total)| ((*name).to_string(), *total))
        .collect()
}

fn standings_page(rows: &[(&str, &str)]) -> String {
    let mut html = String::from(
        "<html><body><table class=\"EntryTable\">\
         <tr><th>Rank</th><th>Entry</th><th>Record</th></tr>",
    );
    for (i, (name, record)) in rows.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"#\">{name}</a></td><td>{record}</td></tr>",
            i + 1
        ));
    }
    html.push_str("</table></body></html>");
    html
}

#[test]
fn test_normalize_name() {
    assert_eq!(normalize_name("Bob\u{2019}s Picks!"), "bob's picks");
    assert_eq!(normalize_name("Bob`s  PICKS"), "bob's  picks");
    assert_eq!(normalize_name("Team #1 (2025)"), "team 1 2025");
}

#[test]
fn test_record_score() {
    assert_eq!(record_score("10-3"), Some(4));
    assert_eq!(record_score(" 0-0 "), Some(0));
    assert_eq!(record_score("7"), None);
    assert_eq!(record_score("a-b"), None);
}

#[test]
fn test_compare_scoreboards() {
    let ours = totals(&[
        ("Bob's Picks", 12),
        ("Team Alpha", 4),
        ("Team Beta", -2),
        ("Only Ours", 1),
    ]);
    let espn = totals(&[
        ("Bob\u{2019}s Picks", 12),
        ("TEAM ALPHA", 5),
        ("Team Beta", -2),
        ("Only Espn", 3),
    ]);

    let differences = compare_scoreboards(&ours, &espn);

    assert_eq!(
        differences,
        vec![
            Difference::MissingFromOurs {
                espn_name: "Only Espn".to_string(),
                espn: 3,
            },
            Difference::MissingFromEspn {
                our_name: "Only Ours".to_string(),
                ours: 1,
            },
            Difference::ScoreMismatch {
                our_name: "Team Alpha".to_string(),
                espn_name: "TEAM ALPHA".to_string(),
                ours: 4,
                espn: 5,
            },
        ]
    );
    assert!(differences[2].to_string().contains("ours = 4, ESPN = 5"));
    assert!(compare_scoreboards(&ours, &ours).is_empty());
}

#[test]
fn test_read_espn_standings() -> Result<(), Box<dyn std::error::Error>> {
    let html = standings_page(&[("Team Alpha", "10-3"), ("Team Beta", "6-7"), ("Broken", "n/a")]);
    let standings = read_espn_standings(&html)?;
    assert_eq!(standings, totals(&[("Team Alpha", 4), ("Team Beta", -8)]));

    let missing = read_espn_standings("<html><body><p>Loading</p></body></html>");
    assert!(matches!(missing, Err(PickemError::Standings(_))));
    Ok(())
}

#[test]
fn test_report_totals_read_back_from_rendered_page() -> Result<(), Box<dyn std::error::Error>> {
    let mut alpha = Participant::new("Team Alpha", DEFAULT_OWNER);
    alpha.add_weekly_picks(1, [Pick::new("DAL", PickOutcome::Correct)])?;
    let mut beta = Participant::new("Bob's Picks", DEFAULT_OWNER);
    beta.add_weekly_picks(1, [Pick::new("SF", PickOutcome::Incorrect)])?;
    let data = build_score_data(&[alpha, beta]);
    let generated_at = Local
        .with_ymd_and_hms(2025, 11, 2, 8, 0, 0)
        .single()
        .ok_or("ambiguous timestamp")?;

    let html = render_scoreboard_page(&data, generated_at).into_string();
    let read_back = read_report_totals(&html)?;

    assert_eq!(read_back, report_totals(&data));
    assert_eq!(read_back, totals(&[("Team Alpha", 1), ("Bob's Picks", -2)]));
    Ok(())
}

#[tokio::test]
async fn test_compare_with_saved_standings() -> Result<(), Box<dyn std::error::Error>> {
    let dir = temp_dir("standings")?;
    let first = dir.join("standings_1.html");
    let second = dir.join("standings_2.html");
    std::fs::write(&first, standings_page(&[("Team Alpha", "1-0")]))?;
    std::fs::write(&second, standings_page(&[("Bob\u{2019}s Picks", "0-2")]))?;
    let pages = vec![
        check_readable_file(first.to_str().ok_or("path")?)?,
        check_readable_file(second.to_str().ok_or("path")?)?,
    ];

    let mut alpha = Participant::new("Team Alpha", DEFAULT_OWNER);
    alpha.add_weekly_picks(1, [Pick::new("DAL", PickOutcome::Correct)])?;
    let mut bob = Participant::new("Bob's Picks", DEFAULT_OWNER);
    bob.add_weekly_picks(1, [Pick::new("SF", PickOutcome::Incorrect)])?;
    let data = build_score_data(&[alpha, bob]);

    let differences = compare_with_saved_standings(&pages, &data).await?;
    assert_eq!(
        differences,
        vec![Difference::ScoreMismatch {
            our_name: "Bob's Picks".to_string(),
            espn_name: "Bob\u{2019}s Picks".to_string(),
            ours: -2,
            espn: -4,
        }]
    );

    assert!(check_readable_file(dir.join("missing.html").to_str().ok_or("path")?).is_err());
    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
