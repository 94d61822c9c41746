use chrono::Local;
use rusty_pickem::args::{self, CleanArgs};
use rusty_pickem::controller::browser::WebDriverFactory;
use rusty_pickem::controller::espn::{PickemClient, compare_with_saved_standings};
use rusty_pickem::controller::score::score_ledger;
use rusty_pickem::error::PickemError;
use rusty_pickem::view::score::render_scoreboard_page;

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match args::args_checks() {
        Ok(args) => args,
        Err(e) => {
            error!("Invalid arguments: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Scrape failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CleanArgs) -> Result<(), PickemError> {
    info!(
        group = %args.group_id,
        season = args.season,
        week = ?args.week,
        "Starting pick'em scrape"
    );

    let factory = Arc::new(WebDriverFactory::new(
        args.webdriver_url.clone(),
        args.headless,
    )?);
    let client = PickemClient::new(args.scrape_config(), factory);
    let ledger = client.run(args.week).await?;

    let score_data = score_ledger(&ledger);
    for ranked in &score_data.rankings {
        info!(rank = ranked.rank, total = ranked.total, "{}", ranked.name);
    }

    let page = render_scoreboard_page(&score_data, Local::now());
    tokio::fs::write(&args.output, page.into_string()).await?;
    info!(output = %args.output.display(), "Report written");

    if !args.compare_with.is_empty() {
        compare_with_saved_standings(&args.compare_with, &score_data).await?;
    }
    Ok(())
}
