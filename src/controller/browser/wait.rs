use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

use super::{BrowserError, BrowserSession, ElementHandle, Query};

/// Upper bounds for every wait the scraper performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Results grid presence and visibility.
    pub grid: Duration,
    /// Week selector lookups.
    pub selector: Duration,
    /// The "Group Picks" control after loading the group page.
    pub navigation: Duration,
    /// Confirmation that a pagination click took effect.
    pub page_change: Duration,
    /// Pause after a pagination click before checking for the change.
    pub settle: Duration,
    pub poll: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            grid: Duration::from_secs(20),
            selector: Duration::from_secs(5),
            navigation: Duration::from_secs(10),
            page_change: Duration::from_secs(5),
            settle: Duration::from_secs(1),
            poll: Duration::from_millis(250),
        }
    }
}

impl Timeouts {
    /// No waiting at all; every check runs exactly once.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            grid: Duration::ZERO,
            selector: Duration::ZERO,
            navigation: Duration::ZERO,
            page_change: Duration::ZERO,
            settle: Duration::ZERO,
            poll: Duration::ZERO,
        }
    }
}

/// Polls `check` until it yields a value or `timeout` elapses. The check runs
/// at least once. `Ok(None)` means the deadline passed.
///
/// # Errors
///
/// Will return `Err` as soon as the check does.
pub async fn wait_until<T, F, Fut>(
    timeout: Duration,
    poll: Duration,
    mut check: F,
) -> Result<Option<T>, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = check().await? {
            return Ok(Some(found));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        sleep(poll.min(deadline - now)).await;
    }
}

/// First element matching `query`, waiting up to `timeout` for it to appear.
///
/// # Errors
///
/// Will return `Err` if the session fails while looking.
pub async fn wait_for_element(
    session: &dyn BrowserSession,
    query: &Query,
    timeout: Duration,
    poll: Duration,
) -> Result<Option<ElementHandle>, BrowserError> {
    wait_until(timeout, poll, move || async move {
        Ok(session.find_all(query).await?.into_iter().next())
    })
    .await
}

/// Waits for `element` to be displayed.
///
/// # Errors
///
/// Will return `Err` if the session fails while looking.
pub async fn wait_for_visible(
    session: &dyn BrowserSession,
    element: &ElementHandle,
    timeout: Duration,
    poll: Duration,
) -> Result<bool, BrowserError> {
    let visible = wait_until(timeout, poll, move || async move {
        Ok(session.is_displayed(element).await?.then_some(()))
    })
    .await?;
    Ok(visible.is_some())
}
