//! Halal Joints restaurant scraper
//!
//! Drives headless Chrome over a neighbourhood listing page, reads every
//! restaurant card (title, image, link), follows each card to its detail
//! page (address, phone, Instagram) and returns the records sorted by title.
//!
//! # Example
//!
//! ```rust,ignore
//! use halal_joints_scraper::{ListingRequest, ListingService, ScraperConfig};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ListingService::new(ScraperConfig::default());
//!
//!     let request = ListingRequest::new(
//!         "https://www.halaljoints.com/neighbourhood/central-london-united-kingdom",
//!     );
//!
//!     let report = service.call(request).await.unwrap();
//!     println!("Restaurants: {}", report.records.len());
//! }
//! ```

pub mod browser;
pub mod clean;
pub mod config;
pub mod error;
pub mod output;
pub mod restaurant;
pub mod selectors;
pub mod service;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::ChromeSession;
pub use clean::clean;
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use output::OutputFormat;
pub use restaurant::{ListingReport, ListingScraper, RestaurantRecord, SocialLink};
pub use selectors::{FieldName, SelectorStrategy, SelectorTable};
pub use service::{ListingRequest, ListingService};
pub use traits::{Node, Scope, Session, Tab};
