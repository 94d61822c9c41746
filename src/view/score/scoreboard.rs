use crate::model::ScoreData;
use maud::{Markup, html};

#[must_use]
pub fn render_scoreboard(data: &ScoreData) -> Markup {
    html! {
        h3 { "Standings" }

        table class="styled-table" id="standings" {
            thead {
                tr {
                    th { "RANK" }
                    th { "TEAM" }
                    th { "TOTAL" }
                }
            }
            tbody {
                @if data.rankings.is_empty() {
                    tr {
                        td colspan="3" { "No picks found" }
                    }
                }
                @for ranked in &data.rankings {
                    tr {
                        td { (ranked.rank) }
                        td class="team_name" { (ranked.name) }
                        td class="overall_score" { (ranked.total) }
                    }
                }
            }
        }
    }
}
