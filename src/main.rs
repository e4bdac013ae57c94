//! Scrapes one Halal Joints listing page and writes the restaurants to disk.
//!
//! ```
//! cargo run -- --format csv
//! HALAL_LISTING_URL=https://www.halaljoints.com/neighbourhood/... cargo run -- --titles-only --format titles-json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use halal_joints_scraper::config::{DEFAULT_BASE_URL, DEFAULT_LISTING_URL, DEFAULT_SCREENSHOT_PATH};
use halal_joints_scraper::output::write_to_path;
use halal_joints_scraper::{
    ListingReport, ListingRequest, ListingService, OutputFormat, ScraperConfig, SelectorTable,
};
use tower::Service;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Scrape restaurant listings from Halal Joints")]
struct Args {
    /// Neighbourhood listing page
    #[arg(long, env = "HALAL_LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    url: String,

    /// Origin for relative restaurant links
    #[arg(long, env = "HALAL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Defaults to restaurant_info.csv / restaurant_titles.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only read listing cards; skip detail pages
    #[arg(long)]
    titles_only: bool,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    #[arg(long, default_value = DEFAULT_SCREENSHOT_PATH)]
    screenshot: PathBuf,

    #[arg(long)]
    no_screenshot: bool,

    /// JSON selector table overriding the built-in one
    #[arg(long, env = "HALAL_SELECTORS")]
    selectors: Option<PathBuf>,

    /// Detail pages fetched at once (1 = strictly sequential)
    #[arg(long, default_value_t = 1)]
    detail_concurrency: usize,

    #[arg(long, default_value_t = 30)]
    navigation_timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    selector_timeout_secs: u64,

    /// Chrome/Chromium binary
    #[arg(long, env = "CHROME_PATH")]
    chrome: Option<PathBuf>,

    #[arg(long)]
    debug: bool,
}

impl Args {
    fn to_config(&self) -> Result<ScraperConfig, Box<dyn std::error::Error>> {
        let selectors = match &self.selectors {
            Some(path) => SelectorTable::from_json_file(path)?,
            None => SelectorTable::default(),
        };

        let mut config = ScraperConfig::new(&self.url)
            .with_base_url(&self.base_url)
            .with_headless(!self.headed)
            .with_follow_details(!self.titles_only)
            .with_detail_concurrency(self.detail_concurrency)
            .with_navigation_timeout(Duration::from_secs(self.navigation_timeout_secs))
            .with_selector_timeout(Duration::from_secs(self.selector_timeout_secs))
            .with_screenshot_path((!self.no_screenshot).then(|| self.screenshot.clone()))
            .with_debug(self.debug)
            .with_selectors(selectors);

        if let Some(chrome) = &self.chrome {
            config = config.with_chrome_executable(chrome);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = args.to_config()?;
    let mut service = ListingService::new(config);

    let report = match service.call(ListingRequest::new(&args.url)).await {
        Ok(report) => report,
        Err(e) => {
            error!("Scrape failed: {}", e);
            ListingReport::new(&args.url)
        }
    };

    if report.is_empty() {
        println!("\nNo restaurant information found.");
        println!("The website might have a different structure or be blocking the browser.");
        return Ok(());
    }

    println!("\nFound {} restaurants:", report.records.len());
    for (i, record) in report.records.iter().enumerate() {
        println!(
            "{}. {} | Image: {}",
            i + 1,
            record.title,
            record.image_url.as_deref().unwrap_or("-")
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.format.default_path()));

    match write_to_path(&report.records, args.format, &output) {
        Ok(path) => {
            println!("\nRestaurant information saved to {}", output.display());
            println!("Full path: {}", path.display());
        }
        Err(e) => error!("Failed to write {}: {}", output.display(), e),
    }

    Ok(())
}
