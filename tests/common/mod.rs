#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusty_pickem::controller::browser::{
    BrowserError, BrowserSession, ElementHandle, Query, SessionFactory, Timeouts,
};
use rusty_pickem::controller::espn::ScrapeConfig;
use rusty_pickem::model::TieConfig;
use scraper::{ElementRef, Html};

/// One pick cell in a simulated grid.
#[derive(Debug, Clone)]
pub enum Cell {
    NoPick,
    Correct(&'static str),
    Incorrect(&'static str),
    Pending(&'static str),
    /// Legacy hashed class names for the markers.
    LegacyCorrect(&'static str),
    LegacyIncorrect(&'static str),
}

/// One participant row: `data-idx`, entry name, pick cells.
pub type Row = (u32, &'static str, Vec<Cell>);

/// Markup of one results page: an entries table and a picks table, the way
/// ESPN lays out the group pick grid.
pub fn grid_page(rows: &[Row]) -> String {
    let mut html = String::from(
        "<table class=\"GroupPickGrid-entries\"><thead>\
         <tr><th>GROUP ENTRIES</th></tr><tr><th>Entry</th></tr></thead><tbody>",
    );
    for (idx, name, _) in rows {
        let _ = write!(
            html,
            "<tr data-idx=\"{idx}\"><td class=\"Table__TD GroupPickGrid-column--entryName\">\
             <a class=\"GroupPickGrid-entryLink\" href=\"#\">{name}</a></td></tr>"
        );
    }
    html.push_str("</tbody></table>");

    html.push_str("<table class=\"GroupPickGrid-picks\"><thead><tr><th>PICKS</th></tr></thead><tbody>");
    for (idx, _, cells) in rows {
        let _ = write!(html, "<tr data-idx=\"{idx}\">");
        for cell in cells {
            html.push_str(&pick_cell(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn pick_cell(cell: &Cell) -> String {
    let (team, marker) = match cell {
        Cell::NoPick => {
            return "<td class=\"Table__TD GroupPickGrid-column--pick noPick\"></td>".to_string();
        }
        Cell::Correct(team) => (team, "<div class=\"PickCorrect-checkMark\"></div>"),
        Cell::Incorrect(team) => (team, "<div class=\"PickIncorrect-crossMark\"></div>"),
        Cell::Pending(team) => (team, ""),
        Cell::LegacyCorrect(team) => (team, "<svg class=\"css-1skkwww\"></svg>"),
        Cell::LegacyIncorrect(team) => (team, "<svg class=\"css-8wf538\"></svg>"),
    };
    format!(
        "<td class=\"Table__TD GroupPickGrid-column--pick\"><img alt=\"{team}\" src=\"logo.png\">{marker}</td>"
    )
}

/// The simulated contest: pages per week plus knobs for failure modes.
#[derive(Debug, Default)]
pub struct FakeSite {
    pub weeks: BTreeMap<u8, Vec<String>>,
    pub has_dropdown: bool,
    pub group_picks_missing: bool,
    /// Weeks whose grid markup cannot be read.
    pub failing_weeks: BTreeSet<u8>,
    /// Page a freshly opened week starts on.
    pub start_page: usize,
    /// "Prev" stays enabled on the first page; clicking it re-renders in place.
    pub prev_never_disables: bool,
    /// "Next" stays enabled on the last page; clicking it re-renders in place.
    pub next_never_disables: bool,
    /// Pagination buttons recognisable only by their `aria-label`.
    pub aria_only_buttons: bool,
    /// Pagination buttons are replaced between lookup and click, every time.
    pub stale_clicks: bool,
    stats: SiteStats,
}

#[derive(Debug, Default)]
pub struct SiteStats {
    pub sessions_opened: AtomicUsize,
    pub open_now: AtomicUsize,
    pub max_open: AtomicUsize,
    pub next_clicks: AtomicUsize,
    pub prev_clicks: AtomicUsize,
    pub stale_clicks: AtomicUsize,
    pub closed: AtomicUsize,
}

impl FakeSite {
    pub fn new(weeks: BTreeMap<u8, Vec<String>>) -> Self {
        Self {
            weeks,
            has_dropdown: true,
            ..Self::default()
        }
    }

    /// A contest still in its first week: no dropdown, one week of pages.
    pub fn single_week(pages: Vec<String>) -> Self {
        Self {
            weeks: BTreeMap::from([(1, pages)]),
            has_dropdown: false,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> &SiteStats {
        &self.stats
    }

    fn latest_week(&self) -> u8 {
        self.weeks.keys().next_back().copied().unwrap_or(1)
    }

    fn page_count(&self, week: u8) -> usize {
        self.weeks.get(&week).map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    GroupPage,
    Results { week: u8, page: usize },
}

#[derive(Debug)]
struct SessionState {
    view: View,
    generation: u64,
    closed: bool,
}

/// A browser tab over a [`FakeSite`]. Every state change re-renders the page,
/// so handles taken before it go stale.
pub struct FakeSession {
    site: Arc<FakeSite>,
    state: Mutex<SessionState>,
}

fn stale() -> BrowserError {
    BrowserError::WebDriver {
        error: "stale element reference".to_string(),
        message: "element is not attached to the page document".to_string(),
    }
}

impl FakeSession {
    pub fn new(site: Arc<FakeSite>) -> Self {
        Self {
            site,
            state: Mutex::new(SessionState {
                view: View::Blank,
                generation: 0,
                closed: false,
            }),
        }
    }

    /// Opens directly on the results of `week`, as if navigation already
    /// happened.
    pub fn on_week(site: Arc<FakeSite>, week: u8) -> Self {
        let session = Self::new(site);
        {
            let mut state = session.state.lock().unwrap();
            let page = session.site.start_page;
            state.view = View::Results { week, page };
        }
        session
    }

    fn snapshot(&self) -> (View, u64) {
        let state = self.state.lock().unwrap();
        (state.view, state.generation)
    }

    fn set_view(&self, view: View) {
        let mut state = self.state.lock().unwrap();
        state.view = view;
        state.generation += 1;
    }

    fn render(&self, view: View) -> String {
        let mut html = String::from("<html><body>");
        match view {
            View::Blank => {}
            View::GroupPage => {
                html.push_str("<h1>Group</h1>");
                if !self.site.group_picks_missing {
                    html.push_str("<nav><a href=\"#\" data-action=\"group-picks\">Group Picks</a></nav>");
                }
            }
            View::Results { week, page } => {
                if self.site.has_dropdown {
                    html.push_str("<select class=\"dropdown__select\">");
                    for w in self.site.weeks.keys() {
                        let _ = write!(html, "<option value=\"{w}\">Week {w}</option>");
                    }
                    html.push_str("</select>");
                }
                let pages = self.site.weeks.get(&week);
                if let Some(content) = pages.and_then(|p| p.get(page)) {
                    let _ = write!(
                        html,
                        "<div class=\"GroupPickGrid-table\" data-week=\"{week}\">{content}</div>"
                    );
                }
                let count = self.site.page_count(week);
                let prev_disabled = page == 0 && !self.site.prev_never_disables;
                let next_disabled = page + 1 >= count && !self.site.next_never_disables;
                html.push_str("<div class=\"Pagination\">");
                html.push_str(&self.pagination_button("prev", prev_disabled));
                html.push_str(&self.pagination_button("next", next_disabled));
                html.push_str("</div>");
            }
        }
        html.push_str("</body></html>");
        html
    }

    fn pagination_button(&self, action: &str, disabled: bool) -> String {
        let disabled = if disabled { " disabled" } else { "" };
        if self.site.aria_only_buttons {
            let arrow = if action == "prev" { "&lsaquo;" } else { "&rsaquo;" };
            format!(
                "<button class=\"Btn Btn--icon\" aria-label=\"{action} page\" data-action=\"{action}\"{disabled}>{arrow}</button>"
            )
        } else {
            let label = if action == "prev" { "Prev" } else { "Next" };
            format!(
                "<button class=\"Pagination__Button--{action}\" data-action=\"{action}\"{disabled}>{label}</button>"
            )
        }
    }

    /// Runs `f` on the element behind `handle` in the current rendering.
    fn with_element<T>(
        &self,
        handle: &ElementHandle,
        f: impl FnOnce(ElementRef<'_>) -> T,
    ) -> Result<T, BrowserError> {
        let (view, generation) = self.snapshot();
        let (handle_gen, index) = parse_handle(handle).ok_or_else(stale)?;
        if handle_gen != generation {
            return Err(stale());
        }
        let document = Html::parse_document(&self.render(view));
        let element = all_elements(&document)
            .nth(index)
            .ok_or_else(stale)?;
        Ok(f(element))
    }

    fn is_failing_grid(&self, view: View) -> bool {
        matches!(view, View::Results { week, .. } if self.site.failing_weeks.contains(&week))
    }
}

fn parse_handle(handle: &ElementHandle) -> Option<(u64, usize)> {
    let (generation, index) = handle.id().split_once(':')?;
    Some((generation.parse().ok()?, index.parse().ok()?))
}

fn all_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
        self.set_view(View::GroupPage);
        Ok(())
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<ElementHandle>, BrowserError> {
        let (view, generation) = self.snapshot();
        let document = Html::parse_document(&self.render(view));
        Ok(all_elements(&document)
            .enumerate()
            .filter(|(_, el)| query.matches(el))
            .map(|(i, _)| ElementHandle::new(format!("{generation}:{i}")))
            .collect())
    }

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        query: &Query,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let (view, generation) = self.snapshot();
        let (parent_gen, parent_index) = parse_handle(parent).ok_or_else(stale)?;
        if parent_gen != generation {
            return Err(stale());
        }
        let document = Html::parse_document(&self.render(view));
        let parent_id = all_elements(&document)
            .nth(parent_index)
            .ok_or_else(stale)?
            .id();
        Ok(all_elements(&document)
            .enumerate()
            .filter(|(_, el)| el.ancestors().any(|a| a.id() == parent_id))
            .filter(|(_, el)| query.matches(el))
            .map(|(i, _)| ElementHandle::new(format!("{generation}:{i}")))
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        let (action, disabled) = self.with_element(element, |el| {
            (
                el.value().attr("data-action").map(str::to_string),
                el.value().attr("disabled").is_some(),
            )
        })?;
        if disabled {
            return Ok(());
        }
        if self.site.stale_clicks && matches!(action.as_deref(), Some("next" | "prev")) {
            self.site.stats.stale_clicks.fetch_add(1, Ordering::SeqCst);
            return Err(stale());
        }
        let (view, _) = self.snapshot();
        match (action.as_deref(), view) {
            (Some("group-picks"), _) => self.set_view(View::Results {
                week: self.site.latest_week(),
                page: self.site.start_page,
            }),
            (Some("next"), View::Results { week, page }) => {
                self.site.stats.next_clicks.fetch_add(1, Ordering::SeqCst);
                let last = self.site.page_count(week).saturating_sub(1);
                self.set_view(View::Results {
                    week,
                    page: (page + 1).min(last),
                });
            }
            (Some("prev"), View::Results { week, page }) => {
                self.site.stats.prev_clicks.fetch_add(1, Ordering::SeqCst);
                self.set_view(View::Results {
                    week,
                    page: page.saturating_sub(1),
                });
            }
            _ => {}
        }
        Ok(())
    }

    async fn select_option(
        &self,
        select: &ElementHandle,
        value: &str,
    ) -> Result<bool, BrowserError> {
        let has_option = self.with_element(select, |el| {
            el.descendants()
                .filter_map(ElementRef::wrap)
                .any(|opt| opt.value().name() == "option" && opt.value().attr("value") == Some(value))
        })?;
        let Some(week) = value.parse::<u8>().ok().filter(|_| has_option) else {
            return Ok(false);
        };
        self.set_view(View::Results {
            week,
            page: self.site.start_page,
        });
        Ok(true)
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.with_element(element, |_| ())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        self.with_element(element, |_| true)
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        self.with_element(element, |el| el.value().attr(name).map(str::to_string))
    }

    async fn outer_html(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        let (view, _) = self.snapshot();
        if self.is_failing_grid(view) {
            return Err(BrowserError::WebDriver {
                error: "unknown error".to_string(),
                message: "renderer crashed".to_string(),
            });
        }
        self.with_element(element, |el| el.html())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        self.with_element(element, |el| el.text().collect::<String>())
    }

    async fn is_stale(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        match self.with_element(element, |_| ()) {
            Ok(()) => Ok(false),
            Err(e) if e.is_stale() => Ok(true),
            Err(e) => Err(e),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        if !state.closed {
            state.closed = true;
            self.site.stats.open_now.fetch_sub(1, Ordering::SeqCst);
            self.site.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Opens [`FakeSession`]s and tracks how many are alive at once.
pub struct FakeFactory {
    pub site: Arc<FakeSite>,
}

impl FakeFactory {
    pub fn new(site: FakeSite) -> Arc<Self> {
        Arc::new(Self {
            site: Arc::new(site),
        })
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let stats = &self.site.stats;
        stats.sessions_opened.fetch_add(1, Ordering::SeqCst);
        let now = stats.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        stats.max_open.fetch_max(now, Ordering::SeqCst);
        // let other week tasks start before this one gets going
        tokio::task::yield_now().await;
        Ok(Box::new(FakeSession::new(Arc::clone(&self.site))))
    }
}

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(label: &str) -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "rusty_pickem_{label}_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time went backwards")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn test_config(diagnostics_dir: PathBuf, ties: TieConfig) -> ScrapeConfig {
    let mut config = ScrapeConfig::new("123456");
    config.timeouts = Timeouts::immediate();
    config.ties = ties;
    config.diagnostics_dir = diagnostics_dir;
    config
}
