use tracing::{error, info};

use super::diagnostics::Diagnostics;
use super::selectors::{GROUP_PICKS_TEXT, group_picks_query};
use crate::controller::browser::{BrowserSession, Timeouts, wait_for_element};
use crate::error::PickemError;

#[must_use]
pub fn group_url(season: u16, group_id: &str) -> String {
    format!("https://fantasy.espn.com/games/nfl-pigskin-pickem-{season}/group?id={group_id}")
}

/// Loads the group page and opens the "Group Picks" view. On failure a
/// screenshot named `screenshot_name` is saved before the error is returned.
///
/// # Errors
///
/// Will return `Err` if the page cannot be loaded or the control never shows
/// up within the navigation timeout.
pub async fn navigate_to_group_picks(
    session: &dyn BrowserSession,
    url: &str,
    timeouts: &Timeouts,
    diagnostics: &Diagnostics,
    screenshot_name: &str,
) -> Result<(), PickemError> {
    match open_group_picks(session, url, timeouts).await {
        Ok(()) => Ok(()),
        Err(reason) => {
            let saved = diagnostics.capture(session, screenshot_name).await;
            match &saved {
                Some(path) => error!(
                    "Failed to click '{GROUP_PICKS_TEXT}'. Full-page screenshot saved to {}",
                    path.display()
                ),
                None => error!("Failed to click '{GROUP_PICKS_TEXT}'"),
            }
            Err(PickemError::Navigation(reason))
        }
    }
}

async fn open_group_picks(
    session: &dyn BrowserSession,
    url: &str,
    timeouts: &Timeouts,
) -> Result<(), String> {
    session
        .navigate(url)
        .await
        .map_err(|e| format!("could not load {url}: {e}"))?;
    info!(url, "Page loaded, looking for '{GROUP_PICKS_TEXT}'");

    let button = wait_for_element(
        session,
        &group_picks_query(),
        timeouts.navigation,
        timeouts.poll,
    )
    .await
    .map_err(|e| e.to_string())?
    .ok_or_else(|| format!("'{GROUP_PICKS_TEXT}' did not appear on {url}"))?;

    session
        .click(&button)
        .await
        .map_err(|e| format!("clicking '{GROUP_PICKS_TEXT}' failed: {e}"))
}
