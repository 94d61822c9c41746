use std::fmt;
use tracing::{debug, warn};

use crate::controller::browser::{BrowserError, BrowserSession, ElementHandle, Query};

pub const GROUP_PICKS_TEXT: &str = "Group Picks";
pub const PICK_GRID_CLASS: &str = "GroupPickGrid-table";
pub const WEEK_SELECTOR_CLASS: &str = "dropdown__select";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Patterns for the pagination buttons, most specific first. ESPN has renamed
/// these classes between seasons; extend the list rather than editing the
/// walker when it happens again.
#[must_use]
pub fn pagination_queries(direction: Direction) -> Vec<Query> {
    let dir = direction.keyword();
    vec![
        Query::new("button")
            .class_contains(format!("Pagination__Button--{dir}"))
            .enabled(),
        Query::new("button").class_contains(dir).enabled(),
        Query::new("button")
            .class_contains("pagination")
            .class_contains(dir)
            .enabled(),
        Query::new("button").text_contains(dir).enabled(),
        Query::new("button").attr_contains("aria-label", dir).enabled(),
    ]
}

/// Same patterns without the enabled filter, to tell "last page" apart from
/// "control not recognised".
#[must_use]
pub fn any_pagination_queries(direction: Direction) -> Vec<Query> {
    let dir = direction.keyword();
    vec![
        Query::new("button").class_contains(format!("Pagination__Button--{dir}")),
        Query::new("button").class_contains(dir),
        Query::new("button").text_contains(dir),
        Query::new("button").attr_contains("aria-label", dir),
    ]
}

#[must_use]
pub fn pick_grid_query() -> Query {
    Query::any().class_contains(PICK_GRID_CLASS)
}

#[must_use]
pub fn week_selector_query() -> Query {
    Query::any().class_contains(WEEK_SELECTOR_CLASS)
}

#[must_use]
pub fn week_option_query() -> Query {
    Query::new("option")
}

#[must_use]
pub fn group_picks_query() -> Query {
    Query::any().text_contains(GROUP_PICKS_TEXT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstMatch {
    /// Index into the query list that produced the elements.
    pub pattern: usize,
    pub elements: Vec<ElementHandle>,
}

impl FirstMatch {
    #[must_use]
    pub fn first(&self) -> Option<&ElementHandle> {
        self.elements.first()
    }
}

/// Tries each query in order and returns the first one that finds anything.
/// A query the browser rejects is skipped like one that found nothing.
///
/// # Errors
///
/// Will return `Err` only if every query failed, which means the session
/// itself is unusable.
pub async fn first_match(
    session: &dyn BrowserSession,
    queries: &[Query],
) -> Result<Option<FirstMatch>, BrowserError> {
    let mut failures = 0;
    let mut last_error = None;
    for (pattern, query) in queries.iter().enumerate() {
        match session.find_all(query).await {
            Ok(elements) if !elements.is_empty() => {
                debug!(pattern = pattern + 1, %query, "pattern matched");
                return Ok(Some(FirstMatch { pattern, elements }));
            }
            Ok(_) => debug!(pattern = pattern + 1, %query, "pattern found nothing"),
            Err(e) => {
                warn!(pattern = pattern + 1, %query, "error with pattern: {e}");
                failures += 1;
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if failures == queries.len() => Err(e),
        _ => Ok(None),
    }
}
