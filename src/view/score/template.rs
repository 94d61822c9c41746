use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, html};

use crate::model::ScoreData;
use crate::view::score::{render_scoreboard, render_weekly_scores};

pub const PAGE_TITLE: &str = "Pigskin Pick'em Scoreboard";

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
.styled-table{border-collapse:collapse;margin:1em 0}\
.styled-table th,.styled-table td{border:1px solid #ccc;padding:4px 8px;text-align:center}\
.styled-table thead tr{background:#1f4e79;color:#fff}\
.week-record{font-size:0.8em;color:#555}";

/// The whole static report page.
#[must_use]
pub fn render_scoreboard_page(data: &ScoreData, generated_at: DateTime<Local>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PAGE_TITLE) }
                style { (STYLE) }
            }
            body {
                h1 { (PAGE_TITLE) }
                p class="generated" {
                    "Last updated " (generated_at.format("%Y-%m-%d %H:%M:%S"))
                }
                (render_scoreboard(data))
                (render_weekly_scores(data))
            }
        }
    }
}
