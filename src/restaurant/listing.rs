//! Listing page orchestration

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::browser::ChromeSession;
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{Node, Scope, Session, Tab};

use super::card::extract_card;
use super::detail::extract_detail;
use super::types::{CardFields, CardOutcome, DetailFields, ListingReport, RestaurantRecord};

/// Walks a listing page card by card and builds the sorted record set.
pub struct ListingScraper {
    config: ScraperConfig,
}

impl ListingScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Launches Chrome, scrapes the listing and shuts Chrome down again.
    ///
    /// A browser that fails to launch or a listing page that fails to load
    /// yields an empty report.
    pub async fn run(&self) -> ListingReport {
        match self.try_run().await {
            Ok(report) => report,
            Err(e) => {
                error!("Listing scrape failed: {}", e);
                ListingReport::new(&self.config.listing_url)
            }
        }
    }

    /// Like [`run`](Self::run) but surfaces the fatal error.
    pub async fn try_run(&self) -> Result<ListingReport, ScraperError> {
        let session = ChromeSession::launch(&self.config).await?;
        let result = self.scrape(&session).await;

        if let Err(e) = session.close().await {
            debug!("Failed to close browser: {}", e);
        }

        result
    }

    /// Scrapes the listing with an already running session.
    pub async fn scrape<S: Session>(&self, session: &S) -> Result<ListingReport, ScraperError> {
        let tab = session.open_tab().await?;
        let result = self.scrape_listing(session, &tab).await;

        if let Err(e) = tab.close().await {
            debug!("Failed to close listing tab: {}", e);
        }

        result
    }

    async fn scrape_listing<S: Session>(
        &self,
        session: &S,
        tab: &S::Tab,
    ) -> Result<ListingReport, ScraperError> {
        let config = &self.config;
        let selectors = &config.selectors;

        info!("Navigating to {}...", config.listing_url);
        tab.goto(&config.listing_url, config.navigation_timeout).await?;

        info!("Waiting for content to load...");
        match tab.wait_for(&selectors.cards_ready, config.selector_timeout).await {
            Ok(()) => info!("Found restaurant links, page seems loaded"),
            Err(e) if e.is_timeout() => warn!("Timeout waiting for restaurant links: {}", e),
            Err(e) => error!("Waiting for restaurant links failed, continuing: {}", e),
        }

        self.save_screenshot(tab).await;

        let cards = tab.find_all(&selectors.cards).await?;
        let total = cards.len();
        info!("Found {} restaurant links", total);

        let mut report = ListingReport::new(&config.listing_url);
        report.cards_found = total;
        let mut seen = HashSet::new();

        if config.detail_concurrency <= 1 {
            for (i, card) in cards.iter().enumerate() {
                let Some(fields) = self.accept_card(card, i, total, &mut report, &mut seen).await else {
                    continue;
                };
                let detail = self.details_for(session, &fields).await;
                let record = RestaurantRecord::new(fields, detail);
                info!("Added restaurant: {}", record.title);
                report.records.push(record);
            }
        } else {
            let mut accepted = Vec::new();
            for (i, card) in cards.iter().enumerate() {
                if let Some(fields) = self.accept_card(card, i, total, &mut report, &mut seen).await {
                    accepted.push(fields);
                }
            }

            let pending: Vec<_> = accepted
                .iter()
                .map(|fields| self.details_for(session, fields))
                .collect();
            let details: Vec<DetailFields> = stream::iter(pending)
                .buffered(config.detail_concurrency)
                .collect()
                .await;

            for (fields, detail) in accepted.into_iter().zip(details) {
                info!("Added restaurant: {}", fields.title);
                report.records.push(RestaurantRecord::new(fields, detail));
            }
        }

        report.sort();
        info!(
            "Found {} restaurants ({} skipped, {} failed, {} duplicates)",
            report.records.len(),
            report.skipped,
            report.failed,
            report.duplicates
        );

        Ok(report)
    }

    /// Extracts one card and tallies the outcome; `None` when the card
    /// produces no new record.
    async fn accept_card<N: Node>(
        &self,
        card: &N,
        index: usize,
        total: usize,
        report: &mut ListingReport,
        seen: &mut HashSet<String>,
    ) -> Option<CardFields> {
        debug!("Processing link {}/{}", index + 1, total);

        match extract_card(card, &self.config.selectors).await {
            CardOutcome::Extracted(fields) => {
                info!(
                    "Processing link {}/{}: {}",
                    index + 1,
                    total,
                    fields.detail_link.as_deref().unwrap_or("-")
                );
                let key = fields
                    .detail_link
                    .clone()
                    .unwrap_or_else(|| fields.title.clone());
                if !seen.insert(key) {
                    info!("Duplicate card for '{}', keeping the first", fields.title);
                    report.duplicates += 1;
                    return None;
                }
                Some(fields)
            }
            CardOutcome::Skipped(reason) => {
                info!("Skipping link {}/{}: {:?}", index + 1, total, reason);
                report.skipped += 1;
                None
            }
            CardOutcome::Failed(e) => {
                error!("Error processing link {}/{}: {}", index + 1, total, e);
                report.failed += 1;
                None
            }
        }
    }

    async fn details_for<S: Session>(&self, session: &S, fields: &CardFields) -> DetailFields {
        if !self.config.follow_details {
            return DetailFields::default();
        }
        match &fields.detail_link {
            Some(link) => extract_detail(session, &self.config.detail_url(link), &self.config).await,
            None => DetailFields::default(),
        }
    }

    /// Full-page screenshot for debugging; failures are only logged.
    async fn save_screenshot<T: Tab>(&self, tab: &T) {
        let Some(path) = &self.config.screenshot_path else {
            return;
        };

        let png = match tab.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Failed to take screenshot: {}", e);
                return;
            }
        };

        if self.config.debug {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
            debug!("Listing screenshot: data:image/png;base64,{}", encoded);
        }

        match tokio::fs::write(path, &png).await {
            Ok(()) => info!("Saved full page screenshot as {}", path.display()),
            Err(e) => warn!("Failed to save screenshot to {}: {}", path.display(), e),
        }
    }
}
