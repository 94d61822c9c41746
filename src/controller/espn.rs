pub mod diagnostics;
pub mod extract;
pub mod navigation;
pub mod pagination;
pub mod reconcile;
pub mod scheduler;
pub mod selectors;

pub use diagnostics::Diagnostics;
pub use extract::{PageExtractor, extract_page};
pub use navigation::{group_url, navigate_to_group_picks};
pub use pagination::{MAX_PAGES, MAX_PREV_CLICKS, PageChange, PaginationWalker};
pub use reconcile::{
    Difference, compare_scoreboards, compare_with_saved_standings, normalize_name,
    read_espn_standings, read_report_totals, record_score, report_totals,
};
pub use scheduler::{
    DEFAULT_SEASON, MAX_WORKERS, PickemClient, ScrapeConfig, WeekDiscovery, WeekOption,
    discover_weeks, parse_week_label,
};
pub use selectors::{Direction, FirstMatch, first_match};
