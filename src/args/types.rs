use clap::Parser;
use std::path::PathBuf;

use crate::model::TieConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ESPN pick'em group id, the `id=` part of the group page URL.
    #[arg(short = 'g', long, value_name = "GROUP_ID")]
    pub group_id: String,

    /// Where the HTML report is written.
    #[arg(
        short = 'o',
        long,
        value_name = "OUTPUT_FILE",
        default_value = "/tmp/sb-index.html",
        value_parser = crate::args::validation::check_parent_dir_is_writeable
    )]
    pub output: PathBuf,

    /// Scrape only this week (1-18). All available weeks when omitted.
    #[arg(long, value_name = "WEEK", value_parser = crate::args::validation::check_week)]
    pub week: Option<u8>,

    #[arg(long, value_name = "SEASON", default_value = "2025")]
    pub season: u16,

    /// WebDriver endpoint, e.g. a running chromedriver.
    #[arg(long, value_name = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headed: bool,

    /// JSON file mapping week numbers to tied teams, e.g. {"5": ["DAL"]}.
    #[arg(
        long,
        value_name = "TIES_JSON",
        value_parser = crate::args::validation::check_readable_file_and_ties
    )]
    pub ties: Option<TieConfig>,

    /// Browser sessions running at once.
    #[arg(
        long,
        value_name = "WORKERS",
        default_value = "4",
        value_parser = crate::args::validation::check_workers
    )]
    pub workers: usize,

    /// Directory for failure screenshots.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub diagnostics_dir: PathBuf,

    /// Saved ESPN standings page to check the totals against. Repeat for
    /// every page of the standings.
    #[arg(
        long,
        value_name = "STANDINGS_HTML",
        value_parser = crate::args::validation::check_readable_file
    )]
    pub compare_with: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub group_id: String,
    pub output: PathBuf,
    pub week: Option<u8>,
    pub season: u16,
    pub webdriver_url: String,
    pub headless: bool,
    pub ties: TieConfig,
    pub workers: usize,
    pub diagnostics_dir: PathBuf,
    pub compare_with: Vec<PathBuf>,
}
