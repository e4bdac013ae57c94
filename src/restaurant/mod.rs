//! Restaurant listing scraper
//!
//! Reads restaurant cards off a neighbourhood page, follows each card to its
//! detail page and returns the records sorted by title.

mod card;
mod detail;
mod listing;
mod types;

pub use card::extract_card;
pub use detail::extract_detail;
pub use listing::ListingScraper;
pub use types::{
    CardFields, CardOutcome, DetailFields, ListingReport, RestaurantRecord, SkipReason, SocialLink,
};
