use maud::{Markup, html};

use crate::model::{ScoreData, season_weeks};

/// One row per participant in ranking order, one cell per week with the
/// week's score over its record.
#[must_use]
pub fn render_weekly_scores(data: &ScoreData) -> Markup {
    html! {
        h3 { "Weekly" }

        table class="styled-table" id="weekly-scores" {
            thead {
                tr {
                    th { "TEAM" }
                    @for week in season_weeks() {
                        th { "Wk " (week) }
                    }
                }
            }
            tbody {
                @for ranked in &data.rankings {
                    @let scores = data.weekly_scores.get(&ranked.name);
                    @let records = data.weekly_records.get(&ranked.name);
                    tr {
                        td { (ranked.name) }
                        @for (i, _week) in season_weeks().enumerate() {
                            td {
                                span class="week-score" {
                                    (scores.and_then(|s| s.get(i)).copied().unwrap_or_default())
                                }
                                br;
                                span class="week-record" {
                                    (records.and_then(|r| r.get(i)).map_or("(0-0-0)", String::as_str))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
