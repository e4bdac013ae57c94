//! Restaurant listing types

use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// Social media profile linked from a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub url: String,
    pub platform: String,
}

/// Fields read off one listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    /// Cleaned, non-empty.
    pub title: String,
    pub image_url: String,
    /// Relative path, e.g. `/restaurant/kebab-house`.
    pub detail_link: Option<String>,
}

/// Fields read off a restaurant's detail page. Unresolved fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub address: String,
    pub phone: String,
    pub social_links: Vec<SocialLink>,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub title: String,
    pub image_url: Option<String>,
    pub detail_link: Option<String>,
    pub address: String,
    pub phone: String,
    pub social_links: Vec<SocialLink>,
    pub is_retail: bool,
}

impl RestaurantRecord {
    pub fn new(card: CardFields, detail: DetailFields) -> Self {
        Self {
            title: card.title,
            image_url: Some(card.image_url),
            detail_link: card.detail_link,
            address: detail.address,
            phone: detail.phone,
            social_links: detail.social_links,
            is_retail: true,
        }
    }
}

/// Why a card produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    /// Title resolved but no image did; the card is still dropped.
    MissingImage,
}

/// Result of processing one listing card.
#[derive(Debug)]
pub enum CardOutcome {
    Extracted(CardFields),
    Skipped(SkipReason),
    Failed(ScraperError),
}

/// Aggregate of one listing run.
#[derive(Debug, Clone, Default)]
pub struct ListingReport {
    pub listing_url: String,
    pub cards_found: usize,
    /// Sorted by title.
    pub records: Vec<RestaurantRecord>,
    pub skipped: usize,
    pub failed: usize,
    pub duplicates: usize,
}

impl ListingReport {
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plain byte-wise title order; ties keep discovery order.
    pub(crate) fn sort(&mut self) {
        self.records.sort_by(|a, b| a.title.cmp(&b.title));
    }
}
