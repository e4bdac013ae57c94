//! Browser capability used by the extractors.
//!
//! The extractors only ever talk to these traits; [`crate::browser`] backs
//! them with chromiumoxide.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// Something CSS selectors can be evaluated against: a whole page or a
/// single element.
#[async_trait]
pub trait Scope: Send + Sync {
    type Node: Node;

    /// First element matching `selector`, `None` when nothing matches.
    async fn find(&self, selector: &str) -> Result<Option<Self::Node>, ScraperError>;

    /// All matching elements in DOM order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Node>, ScraperError>;
}

/// Element handle.
#[async_trait]
pub trait Node: Scope<Node = Self> + Sized {
    async fn text(&self) -> Result<Option<String>, ScraperError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, ScraperError>;

    async fn outer_html(&self) -> Result<Option<String>, ScraperError>;
}

/// One browser page/tab.
#[async_trait]
pub trait Tab: Scope + Sized {
    /// Navigate and wait for the load to finish, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Wait until at least one element matches `selector`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Full-page PNG.
    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError>;

    async fn close(self) -> Result<(), ScraperError>;
}

/// A running browser that hands out tabs.
#[async_trait]
pub trait Session: Send + Sync + Sized {
    type Tab: Tab;

    async fn open_tab(&self) -> Result<Self::Tab, ScraperError>;

    /// Release the browser.
    async fn close(self) -> Result<(), ScraperError>;
}
