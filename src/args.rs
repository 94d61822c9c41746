use clap::Parser;

pub mod types;
pub mod validation;

pub use types::{Args, CleanArgs};

use crate::controller::browser::Timeouts;
use crate::controller::espn::ScrapeConfig;
use crate::error::PickemError;

/// Parses and validates the command line.
///
/// # Errors
///
/// Will return `Err` if the arguments are inconsistent.
pub fn args_checks() -> Result<CleanArgs, PickemError> {
    let args = Args::parse();
    args.validate()?;
    Ok(CleanArgs::new(args))
}

impl CleanArgs {
    #[must_use]
    pub fn new(args: Args) -> Self {
        CleanArgs {
            group_id: args.group_id.trim().to_string(),
            output: args.output,
            week: args.week,
            season: args.season,
            webdriver_url: args.webdriver_url.trim_end_matches('/').to_string(),
            headless: !args.headed,
            ties: args.ties.unwrap_or_default(),
            workers: args.workers,
            diagnostics_dir: args.diagnostics_dir,
            compare_with: args.compare_with,
        }
    }

    #[must_use]
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            group_id: self.group_id.clone(),
            season: self.season,
            max_workers: self.workers,
            timeouts: Timeouts::default(),
            ties: self.ties.clone(),
            diagnostics_dir: self.diagnostics_dir.clone(),
        }
    }
}
