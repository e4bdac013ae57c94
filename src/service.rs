use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::restaurant::{ListingReport, ListingScraper};

/// One listing page to scrape.
#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub listing_url: String,
    pub follow_details: Option<bool>,
    pub headless: Option<bool>,
}

impl ListingRequest {
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            follow_details: None,
            headless: None,
        }
    }

    /// Skip detail pages; only card fields are collected.
    pub fn titles_only(mut self) -> Self {
        self.follow_details = Some(false);
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    /// Service defaults overridden by whatever this request sets.
    pub fn into_config(self, defaults: &ScraperConfig) -> ScraperConfig {
        let mut config = defaults.clone();
        config.listing_url = self.listing_url;
        if let Some(follow) = self.follow_details {
            config.follow_details = follow;
        }
        if let Some(headless) = self.headless {
            config.headless = headless;
        }
        config
    }
}

/// tower::Service that runs one Chrome-backed listing scrape per request.
#[derive(Debug, Clone, Default)]
pub struct ListingService {
    defaults: ScraperConfig,
}

impl ListingService {
    pub fn new(defaults: ScraperConfig) -> Self {
        Self { defaults }
    }
}

impl Service<ListingRequest> for ListingService {
    type Response = ListingReport;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ListingRequest) -> Self::Future {
        info!("Listing request received: {}", req.listing_url);
        let config = req.into_config(&self.defaults);

        Box::pin(async move {
            let scraper = ListingScraper::new(config);
            let report = scraper.try_run().await?;

            info!(
                "Listing scrape finished: url={}, records={}",
                report.listing_url,
                report.records.len()
            );

            Ok(report)
        })
    }
}
