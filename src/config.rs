use std::path::PathBuf;
use std::time::Duration;

use crate::selectors::SelectorTable;

pub const DEFAULT_LISTING_URL: &str =
    "https://www.halaljoints.com/neighbourhood/central-london-united-kingdom";
pub const DEFAULT_BASE_URL: &str = "https://www.halaljoints.com";
pub const DEFAULT_SCREENSHOT_PATH: &str = "webpage_full.png";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub listing_url: String,
    /// Origin used to turn relative card links into detail URLs.
    pub base_url: String,
    pub headless: bool,
    pub viewport: (u32, u32),
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    pub screenshot_path: Option<PathBuf>,
    /// Visit each card's detail page for address/phone/social links.
    pub follow_details: bool,
    pub detail_concurrency: usize,
    pub chrome_executable: Option<PathBuf>,
    pub debug: bool,
    pub selectors: SelectorTable,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            viewport: (1920, 1080),
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
            screenshot_path: Some(PathBuf::from(DEFAULT_SCREENSHOT_PATH)),
            follow_details: true,
            detail_concurrency: 1,
            chrome_executable: chrome_executable_from_env(),
            debug: false,
            selectors: SelectorTable::default(),
        }
    }
}

impl ScraperConfig {
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_selector_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self
    }

    pub fn with_screenshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot_path = path;
        self
    }

    pub fn with_follow_details(mut self, follow: bool) -> Self {
        self.follow_details = follow;
        self
    }

    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency.max(1);
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_selectors(mut self, selectors: SelectorTable) -> Self {
        self.selectors = selectors;
        self
    }

    /// Absolute URL for a card's detail link.
    pub fn detail_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

fn chrome_executable_from_env() -> Option<PathBuf> {
    std::env::var("CHROME_PATH")
        .or_else(|_| std::env::var("CHROMIUM_PATH"))
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}
