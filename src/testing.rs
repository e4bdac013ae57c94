//! In-memory stand-ins for the browser traits.
//!
//! Selectors are matched by exact string, which is all the extractors need:
//! they only ever ask for selectors taken from the [`SelectorTable`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::selectors::{FieldName, SelectorTable};
use crate::traits::{Node, Scope, Session, Tab};

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: Option<String>,
    attrs: HashMap<String, String>,
    children: HashMap<String, Vec<FakeNode>>,
    broken: HashSet<String>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children
            .entry(selector.to_string())
            .or_default()
            .push(node);
        self
    }

    /// Lookups of `selector` fail with a query error.
    pub fn broken(mut self, selector: &str) -> Self {
        self.broken.insert(selector.to_string());
        self
    }

    fn lookup(&self, selector: &str) -> Result<Vec<FakeNode>, ScraperError> {
        if self.broken.contains(selector) {
            return Err(ScraperError::Query(format!("{}: node detached", selector)));
        }
        Ok(self.children.get(selector).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Scope for FakeNode {
    type Node = FakeNode;

    async fn find(&self, selector: &str) -> Result<Option<FakeNode>, ScraperError> {
        Ok(self.lookup(selector)?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeNode>, ScraperError> {
        self.lookup(selector)
    }
}

#[async_trait]
impl Node for FakeNode {
    async fn text(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ScraperError> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn outer_html(&self) -> Result<Option<String>, ScraperError> {
        Ok(Some(format!(
            "<a href=\"{}\">{}</a>",
            self.attrs.get("href").map(String::as_str).unwrap_or_default(),
            self.text.as_deref().unwrap_or_default()
        )))
    }
}

/// Pages by URL; any other URL fails to load.
#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, FakeNode>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, document: FakeNode) -> Self {
        self.pages.insert(url.to_string(), document);
        self
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub visits: Mutex<Vec<String>>,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    pub counters: Arc<Counters>,
    fail_open: bool,
}

impl FakeSession {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            counters: Arc::new(Counters::default()),
            fail_open: false,
        }
    }

    /// Every `open_tab` fails, as if the browser crashed.
    pub fn failing_tabs(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

#[async_trait]
impl Session for FakeSession {
    type Tab = FakeTab;

    async fn open_tab(&self) -> Result<FakeTab, ScraperError> {
        if self.fail_open {
            return Err(ScraperError::BrowserInit("target crashed".into()));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeTab {
            site: self.site.clone(),
            counters: self.counters.clone(),
            current: Mutex::new(None),
        })
    }

    async fn close(self) -> Result<(), ScraperError> {
        Ok(())
    }
}

pub struct FakeTab {
    site: Arc<FakeSite>,
    counters: Arc<Counters>,
    current: Mutex<Option<FakeNode>>,
}

impl FakeTab {
    fn document(&self) -> FakeNode {
        self.current.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl Scope for FakeTab {
    type Node = FakeNode;

    async fn find(&self, selector: &str) -> Result<Option<FakeNode>, ScraperError> {
        self.document().find(selector).await
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeNode>, ScraperError> {
        self.document().find_all(selector).await
    }
}

#[async_trait]
impl Tab for FakeTab {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), ScraperError> {
        self.counters.visits.lock().unwrap().push(url.to_string());
        match self.site.pages.get(url) {
            Some(document) => {
                *self.current.lock().unwrap() = Some(document.clone());
                Ok(())
            }
            None => Err(ScraperError::Navigation(format!("{}: net::ERR_NAME_NOT_RESOLVED", url))),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        if self.document().lookup(selector)?.is_empty() {
            return Err(ScraperError::Timeout(format!(
                "'{}' did not appear within {:?}",
                selector, timeout
            )));
        }
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError> {
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn primary_selector(field: FieldName) -> String {
    SelectorTable::default().strategies(field)[0]
        .selector
        .clone()
        .expect("field has a selector")
}

/// Listing card resolvable through the primary title/image selectors.
pub fn card(link: &str, title: Option<&str>, image: Option<&str>) -> FakeNode {
    let mut node = FakeNode::new().attr("href", link);
    if let Some(title) = title {
        node = node.child(&primary_selector(FieldName::Title), FakeNode::with_text(title));
    }
    if let Some(image) = image {
        node = node.child(
            &primary_selector(FieldName::Image),
            FakeNode::new().attr("src", image),
        );
    }
    node
}

/// Listing page whose cards match the default card selectors.
pub fn listing_page(cards: Vec<FakeNode>) -> FakeNode {
    let table = SelectorTable::default();
    let mut page = FakeNode::new();
    for card in cards {
        page = page
            .child(&table.cards, card.clone())
            .child(&table.cards_ready, card);
    }
    page
}

/// Detail page with whichever fields are given.
pub fn detail_page(address: Option<&str>, phone: Option<&str>, instagram: Option<(&str, &str)>) -> FakeNode {
    let table = SelectorTable::default();
    let mut page = FakeNode::new();
    if let Some(address) = address {
        page = page
            .child(&table.detail_ready, FakeNode::new())
            .child(&primary_selector(FieldName::Address), FakeNode::with_text(address));
    }
    if let Some(phone) = phone {
        page = page.child(&primary_selector(FieldName::Phone), FakeNode::with_text(phone));
    }
    if let Some((label, url)) = instagram {
        page = page
            .child(&primary_selector(FieldName::InstagramLabel), FakeNode::with_text(label))
            .child(
                &primary_selector(FieldName::InstagramUrl),
                FakeNode::new().attr("href", url),
            );
    }
    page
}
