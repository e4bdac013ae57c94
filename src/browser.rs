//! chromiumoxide implementation of the browser traits.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{Node, Scope, Session, Tab};

/// Poll interval for selector waits.
const SELECTOR_POLL_INTERVAL_MS: u64 = 250;

/// Re-runs `check` until it reports true. A check still in flight when
/// `timeout` expires is cancelled.
async fn poll_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let polling = async {
        while !check().await {
            sleep(Duration::from_millis(SELECTOR_POLL_INTERVAL_MS)).await;
        }
    };
    tokio::time::timeout(timeout, polling).await.is_ok()
}

/// Headless Chrome plus the task draining its CDP event stream.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScraperError> {
        info!("Launching browser...");

        let (width, height) = config.viewport;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Default::default()
            });

        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(config.navigation_timeout)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder.build().map_err(ScraperError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        info!("Browser launched");
        Ok(Self { browser, handler })
    }
}

#[async_trait]
impl Session for ChromeSession {
    type Tab = ChromeTab;

    async fn open_tab(&self) -> Result<ChromeTab, ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;
        Ok(ChromeTab { page })
    }

    async fn close(mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        closed
            .map(|_| ())
            .map_err(|e| ScraperError::BrowserInit(format!("close: {}", e)))
    }
}

pub struct ChromeTab {
    page: Page,
}

#[async_trait]
impl Scope for ChromeTab {
    type Node = ChromeNode;

    async fn find(&self, selector: &str) -> Result<Option<ChromeNode>, ScraperError> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<ChromeNode>, ScraperError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ScraperError::Query(format!("{}: {}", selector, e)))?;
        Ok(elements.into_iter().map(ChromeNode).collect())
    }
}

#[async_trait]
impl Tab for ChromeTab {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation(format!("{}: {}", url, e))),
            Err(_) => Err(ScraperError::Timeout(format!(
                "navigation to {} exceeded {:?}",
                url, timeout
            ))),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        let start = Instant::now();
        let page = &self.page;

        let present = poll_until(timeout, || async move {
            match page.find_elements(selector).await {
                Ok(elements) => !elements.is_empty(),
                Err(e) => {
                    debug!("Selector check error for '{}': {}", selector, e);
                    false
                }
            }
        })
        .await;

        if present {
            debug!("'{}' present after {:?}", selector, start.elapsed());
            return Ok(());
        }

        Err(ScraperError::Timeout(format!(
            "'{}' did not appear within {:?}",
            selector, timeout
        )))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| ScraperError::Query(format!("screenshot: {}", e)))
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.page
            .close()
            .await
            .map_err(|e| ScraperError::Navigation(format!("close page: {}", e)))
    }
}

pub struct ChromeNode(Element);

#[async_trait]
impl Scope for ChromeNode {
    type Node = ChromeNode;

    async fn find(&self, selector: &str) -> Result<Option<ChromeNode>, ScraperError> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<ChromeNode>, ScraperError> {
        let elements = self
            .0
            .find_elements(selector)
            .await
            .map_err(|e| ScraperError::Query(format!("{}: {}", selector, e)))?;
        Ok(elements.into_iter().map(ChromeNode).collect())
    }
}

#[async_trait]
impl Node for ChromeNode {
    async fn text(&self) -> Result<Option<String>, ScraperError> {
        self.0
            .inner_text()
            .await
            .map_err(|e| ScraperError::Query(format!("text: {}", e)))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ScraperError> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| ScraperError::Query(format!("attribute {}: {}", name, e)))
    }

    async fn outer_html(&self) -> Result<Option<String>, ScraperError> {
        self.0
            .outer_html()
            .await
            .map_err(|e| ScraperError::Query(format!("outer html: {}", e)))
    }
}
