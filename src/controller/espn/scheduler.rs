use futures::future::join_all;
use regex::Regex;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use super::diagnostics::Diagnostics;
use super::extract::PageExtractor;
use super::navigation::{group_url, navigate_to_group_picks};
use super::pagination::PaginationWalker;
use super::selectors::{pick_grid_query, week_option_query, week_selector_query};
use crate::controller::browser::{BrowserSession, SessionFactory, Timeouts, wait_for_element};
use crate::error::PickemError;
use crate::model::{FIRST_WEEK, Ledger, TieConfig, season_weeks};

/// Browsers running at once, at most.
pub const MAX_WORKERS: usize = 4;
pub const DEFAULT_SEASON: u16 = 2025;
const PRIMARY_SCREENSHOT: &str = "error_navigate_to_group_picks.png";

static WEEK_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)week\s*(\d+)").ok());

/// Parses a week dropdown label such as `"Week 7"`. `None` for anything that
/// is not a regular-season week.
#[must_use]
pub fn parse_week_label(label: &str) -> Option<u8> {
    let captures = WEEK_LABEL.as_ref()?.captures(label)?;
    let week: u8 = captures.get(1)?.as_str().parse().ok()?;
    season_weeks().contains(&week).then_some(week)
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub group_id: String,
    pub season: u16,
    pub max_workers: usize,
    pub timeouts: Timeouts,
    pub ties: TieConfig,
    pub diagnostics_dir: PathBuf,
}

impl ScrapeConfig {
    #[must_use]
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            season: DEFAULT_SEASON,
            max_workers: MAX_WORKERS,
            timeouts: Timeouts::default(),
            ties: TieConfig::default(),
            diagnostics_dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        group_url(self.season, &self.group_id)
    }
}

/// One entry of the week dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekOption {
    pub number: u8,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekDiscovery {
    /// No dropdown: only week 1 exists so far.
    SingleWeek,
    Selector(Vec<WeekOption>),
}

/// Everything a week task needs, shared read-only between tasks.
#[derive(Debug)]
struct WeekTaskContext {
    url: String,
    timeouts: Timeouts,
    ties: TieConfig,
    diagnostics: Diagnostics,
}

/// Drives a full scrape: discovers the weeks, fans out one browser per week
/// (bounded), and merges everything into a [`Ledger`].
pub struct PickemClient {
    config: ScrapeConfig,
    factory: Arc<dyn SessionFactory>,
}

impl PickemClient {
    #[must_use]
    pub fn new(config: ScrapeConfig, factory: Arc<dyn SessionFactory>) -> Self {
        Self { config, factory }
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    fn task_context(&self) -> WeekTaskContext {
        WeekTaskContext {
            url: self.config.url(),
            timeouts: self.config.timeouts,
            ties: self.config.ties.clone(),
            diagnostics: Diagnostics::new(self.config.diagnostics_dir.clone()),
        }
    }

    /// Scrapes every available week, or only `week` when given.
    ///
    /// # Errors
    ///
    /// Will return `Err` if no browser session can be opened or the group
    /// picks view cannot be reached. Failures inside a single week are logged
    /// and leave that week empty.
    pub async fn run(&self, week: Option<u8>) -> Result<Arc<Ledger>, PickemError> {
        let ledger = Arc::new(Ledger::new());
        let ctx = Arc::new(self.task_context());

        let session = self.factory.open().await?;
        let discovered = self
            .discover_on_primary(session.as_ref(), &ctx, week, &ledger)
            .await;
        close_quietly(session.as_ref()).await;

        if let WeekDiscovery::Selector(options) = discovered? {
            let selected: Vec<WeekOption> = options
                .into_iter()
                .filter(|option| week.is_none_or(|w| w == option.number))
                .collect();
            info!(
                weeks = ?selected.iter().map(|o| o.number).collect::<Vec<_>>(),
                "Found {} weeks to scrape",
                selected.len()
            );
            self.scrape_weeks_parallel(selected, &ctx, &ledger).await;
        }

        info!(participants = ledger.len(), "scrape finished");
        Ok(ledger)
    }

    /// Reaches the results view on the first session and finds out which
    /// weeks exist. Without a dropdown the lone week is scraped right here.
    async fn discover_on_primary(
        &self,
        session: &dyn BrowserSession,
        ctx: &WeekTaskContext,
        week: Option<u8>,
        ledger: &Ledger,
    ) -> Result<WeekDiscovery, PickemError> {
        navigate_to_group_picks(
            session,
            &ctx.url,
            &ctx.timeouts,
            &ctx.diagnostics,
            PRIMARY_SCREENSHOT,
        )
        .await?;

        let discovery = discover_weeks(session, &ctx.timeouts).await?;
        if discovery == WeekDiscovery::SingleWeek {
            info!("No week dropdown found. Scraping current page as week 1.");
            scrape_single_week(session, ctx, week, ledger).await;
        }
        Ok(discovery)
    }

    async fn scrape_weeks_parallel(
        &self,
        weeks: Vec<WeekOption>,
        ctx: &Arc<WeekTaskContext>,
        ledger: &Arc<Ledger>,
    ) {
        if weeks.is_empty() {
            return;
        }
        let workers = self
            .config
            .max_workers
            .clamp(1, MAX_WORKERS)
            .min(weeks.len());
        let permits = Arc::new(Semaphore::new(workers));
        info!(workers, "scraping weeks in parallel");

        let (week_numbers, handles): (Vec<u8>, Vec<_>) = weeks
            .into_iter()
            .map(|option| {
                let permits = Arc::clone(&permits);
                let factory = Arc::clone(&self.factory);
                let ctx = Arc::clone(ctx);
                let ledger = Arc::clone(ledger);
                let week = option.number;
                let handle = tokio::task::spawn(async move {
                    let _permit =
                        permits
                            .acquire_owned()
                            .await
                            .map_err(|e| PickemError::Task {
                                week,
                                reason: e.to_string(),
                            })?;
                    scrape_week_task(factory.as_ref(), &ctx, &option, &ledger).await
                });
                (week, handle)
            })
            .unzip();

        let results = join_all(handles).await;
        for (week, result) in week_numbers.into_iter().zip(results) {
            match result {
                Ok(Ok(pages)) => info!(week, pages, "Completed scraping week"),
                Ok(Err(e)) => error!(week, "Failed to scrape week: {e}"),
                Err(e) => error!(week, "Week task aborted: {e}"),
            }
        }
    }
}

/// Looks for the week dropdown and reads its options.
///
/// # Errors
///
/// Will return `Err` if the session fails while reading the options.
pub async fn discover_weeks(
    session: &dyn BrowserSession,
    timeouts: &Timeouts,
) -> Result<WeekDiscovery, PickemError> {
    let Some(dropdown) = wait_for_element(
        session,
        &week_selector_query(),
        timeouts.selector,
        timeouts.poll,
    )
    .await?
    else {
        info!("No weeks dropdown found - likely first week of season");
        return Ok(WeekDiscovery::SingleWeek);
    };

    let options = session
        .find_all_in(&dropdown, &week_option_query())
        .await?;
    info!("Found week dropdown with {} options", options.len());
    if options.is_empty() {
        return Ok(WeekDiscovery::SingleWeek);
    }

    let mut weeks = Vec::with_capacity(options.len());
    for option in &options {
        let label = session.text(option).await?;
        let Some(number) = parse_week_label(&label) else {
            warn!("Could not parse week number from: {label:?}");
            continue;
        };
        let value = session
            .attribute(option, "value")
            .await?
            .unwrap_or_else(|| label.trim().to_string());
        weeks.push(WeekOption { number, value });
    }
    Ok(WeekDiscovery::Selector(weeks))
}

/// Week 1 on the primary session, for contests without a week dropdown.
async fn scrape_single_week(
    session: &dyn BrowserSession,
    ctx: &WeekTaskContext,
    requested: Option<u8>,
    ledger: &Ledger,
) {
    if let Some(week) = requested.filter(|w| *w != FIRST_WEEK) {
        info!(week, "Week was requested but only week 1 is available.");
        return;
    }

    match scrape_current_week(session, ctx, FIRST_WEEK, ledger).await {
        Ok(pages) => info!(pages, "Successfully scraped week 1"),
        Err(e) => error!("Failed to scrape week 1: {e}"),
    }
}

async fn scrape_week_task(
    factory: &dyn SessionFactory,
    ctx: &WeekTaskContext,
    option: &WeekOption,
    ledger: &Ledger,
) -> Result<usize, PickemError> {
    let week = option.number;
    info!(week, "Starting parallel scrape");
    let session = factory.open().await?;

    let result = async {
        navigate_to_group_picks(
            session.as_ref(),
            &ctx.url,
            &ctx.timeouts,
            &ctx.diagnostics,
            &format!("error_navigate_week_{week}.png"),
        )
        .await?;
        select_week(session.as_ref(), &ctx.timeouts, option).await?;
        scrape_current_week(session.as_ref(), ctx, week, ledger).await
    }
    .await;

    close_quietly(session.as_ref()).await;
    result
}

/// Picks `option` in the week dropdown. A missing dropdown means the page
/// only has one week, so the current page is used as-is.
async fn select_week(
    session: &dyn BrowserSession,
    timeouts: &Timeouts,
    option: &WeekOption,
) -> Result<(), PickemError> {
    let week = option.number;
    let Some(dropdown) = wait_for_element(
        session,
        &week_selector_query(),
        timeouts.selector,
        timeouts.poll,
    )
    .await?
    else {
        info!(week, "No dropdown found - using current page");
        return Ok(());
    };

    if session.select_option(&dropdown, &option.value).await? {
        info!(week, "Selected week from dropdown");
        Ok(())
    } else {
        Err(PickemError::Task {
            week,
            reason: format!("dropdown has no option with value {:?}", option.value),
        })
    }
}

/// Walks every page of the week currently on screen and merges what it finds.
/// Returns the number of pages captured.
async fn scrape_current_week(
    session: &dyn BrowserSession,
    ctx: &WeekTaskContext,
    week: u8,
    ledger: &Ledger,
) -> Result<usize, PickemError> {
    let grid = wait_for_element(
        session,
        &pick_grid_query(),
        ctx.timeouts.grid,
        ctx.timeouts.poll,
    )
    .await?;
    if grid.is_none() {
        error!(week, "No GroupPickGrid table found");
        return Ok(0);
    }

    let pick_grids = PaginationWalker::new(session, ctx.timeouts, week)
        .walk()
        .await?;

    // parse everything before touching the ledger lock
    let extractor = PageExtractor::new(week, &ctx.ties)?;
    let pages: Vec<_> = pick_grids
        .iter()
        .map(|html| extractor.extract(html))
        .collect();
    for page in pages {
        ledger.merge(week, page)?;
    }
    Ok(pick_grids.len())
}

async fn close_quietly(session: &dyn BrowserSession) {
    if let Err(e) = session.close().await {
        warn!("Could not close browser session: {e}");
    }
}
