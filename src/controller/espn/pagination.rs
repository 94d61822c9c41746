use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::selectors::{
    Direction, any_pagination_queries, first_match, pagination_queries, pick_grid_query,
};
use crate::controller::browser::{
    BrowserError, BrowserSession, ElementHandle, Query, Timeouts, wait_for_element,
    wait_for_visible, wait_until,
};

/// Safety cap on "previous" clicks when rewinding to page one.
pub const MAX_PREV_CLICKS: usize = 20;
/// Safety cap on pages per week.
pub const MAX_PAGES: usize = 50;

/// How a pagination click was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// The clicked button was detached from the page.
    Stale,
    /// The pattern that found the button finds nothing now.
    Disappeared,
    /// The button is still there but disabled.
    Disabled,
    /// Nothing confirmed the click within the wait; carried on anyway.
    Assumed,
}

/// Walks one week's results grid page by page, starting from page one.
pub struct PaginationWalker<'a> {
    session: &'a dyn BrowserSession,
    timeouts: Timeouts,
    week: u8,
}

impl<'a> PaginationWalker<'a> {
    #[must_use]
    pub fn new(session: &'a dyn BrowserSession, timeouts: Timeouts, week: u8) -> Self {
        Self {
            session,
            timeouts,
            week,
        }
    }

    /// Rewinds to the first page, then captures the grid markup of every page
    /// in order.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session fails outright.
    pub async fn walk(&self) -> Result<Vec<String>, BrowserError> {
        let week = self.week;
        info!(week, "Starting pagination");
        self.go_to_first_page().await?;

        let mut pick_grids = Vec::new();
        for page in 1..=MAX_PAGES {
            match self.capture_grid(page).await? {
                Some(html) => {
                    debug!(week, page, "captured grid html");
                    pick_grids.push(html);
                }
                None => warn!(week, page, "No HTML captured"),
            }

            if page == MAX_PAGES {
                warn!(week, "Reached page limit of {MAX_PAGES}, stopping pagination");
                break;
            }
            if self.advance(Direction::Next).await?.is_none() {
                info!(week, pages = page, "No more pages available");
                break;
            }
        }

        info!(week, grids = pick_grids.len(), "Completed pagination");
        Ok(pick_grids)
    }

    /// Clicks "previous" until it is gone or disabled. Returns the number of
    /// clicks made.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session fails outright.
    pub async fn go_to_first_page(&self) -> Result<usize, BrowserError> {
        let mut prev_clicks = 0;
        while self.advance(Direction::Prev).await?.is_some() {
            prev_clicks += 1;
            debug!(week = self.week, prev_clicks, "clicked prev");
            if prev_clicks >= MAX_PREV_CLICKS {
                warn!(week = self.week, "Clicked 'prev' {MAX_PREV_CLICKS} times, stopping");
                break;
            }
        }
        debug!(week = self.week, prev_clicks, "reached first page");
        Ok(prev_clicks)
    }

    /// Waits for the grid, brings it into view and reads its markup. `None`
    /// when the grid never shows up.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session fails outright.
    pub async fn capture_grid(&self, page: usize) -> Result<Option<String>, BrowserError> {
        let Timeouts { grid, poll, .. } = self.timeouts;
        let Some(pick_grid) = wait_for_element(self.session, &pick_grid_query(), grid, poll).await?
        else {
            error!(week = self.week, page, "No pick grid found");
            return Ok(None);
        };

        self.session.scroll_into_view(&pick_grid).await?;
        if !wait_for_visible(self.session, &pick_grid, grid, poll).await? {
            error!(week = self.week, page, "Pick grid never became visible");
            return Ok(None);
        }
        Ok(Some(self.session.outer_html(&pick_grid).await?))
    }

    /// Clicks the `direction` control if one is usable. `None` means there is
    /// no such page to go to.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session fails outright.
    pub async fn advance(&self, direction: Direction) -> Result<Option<PageChange>, BrowserError> {
        let queries = pagination_queries(direction);

        // one retry covers the grid re-rendering between lookup and click
        for _attempt in 0..2 {
            let Some(found) = first_match(self.session, &queries).await? else {
                self.log_missing_control(direction).await;
                return Ok(None);
            };
            let Some(button) = found.first().cloned() else {
                return Ok(None);
            };

            match self.click(&button).await {
                Ok(()) => {
                    let change = self
                        .confirm_page_change(&button, &queries[found.pattern])
                        .await;
                    debug!(week = self.week, %direction, ?change, "clicked pagination button");
                    return Ok(Some(change));
                }
                Err(e) if e.is_stale() => {
                    debug!(week = self.week, %direction, "button went stale before click, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        warn!(
            week = self.week,
            %direction,
            "{direction} button kept going stale, giving up; later pages of this week may be missing"
        );
        Ok(None)
    }

    async fn click(&self, button: &ElementHandle) -> Result<(), BrowserError> {
        self.session.scroll_into_view(button).await?;
        self.session.click(button).await
    }

    async fn confirm_page_change(&self, old_button: &ElementHandle, query: &Query) -> PageChange {
        let Timeouts {
            page_change,
            settle,
            poll,
            ..
        } = self.timeouts;
        if !settle.is_zero() {
            sleep(settle).await;
        }

        let session = self.session;
        let confirmed = wait_until(page_change, poll, move || async move {
            if session.is_stale(old_button).await? {
                return Ok(Some(PageChange::Stale));
            }
            let current = session.find_all(query).await?;
            let Some(button) = current.first() else {
                return Ok(Some(PageChange::Disappeared));
            };
            Ok(is_disabled(session, button)
                .await?
                .then_some(PageChange::Disabled))
        })
        .await;

        match confirmed {
            Ok(Some(change)) => change,
            Ok(None) => {
                warn!(week = self.week, "Page might not have refreshed after click, continuing");
                PageChange::Assumed
            }
            Err(e) => {
                warn!(week = self.week, "Error checking page refresh after click: {e}");
                PageChange::Assumed
            }
        }
    }

    async fn log_missing_control(&self, direction: Direction) {
        match first_match(self.session, &any_pagination_queries(direction)).await {
            Ok(Some(_)) => debug!(week = self.week, %direction, "button disabled, at the end"),
            Ok(None) => warn!(
                week = self.week,
                %direction,
                "No {direction} button found with any pattern; single page, or the pagination markup changed"
            ),
            Err(e) => warn!(week = self.week, %direction, "pagination lookup failed: {e}"),
        }
    }
}

async fn is_disabled(
    session: &dyn BrowserSession,
    button: &ElementHandle,
) -> Result<bool, BrowserError> {
    if session.attribute(button, "disabled").await?.is_some() {
        return Ok(true);
    }
    Ok(session
        .attribute(button, "class")
        .await?
        .is_some_and(|class| class.contains("disabled")))
}
