//! Site-specific selector table.
//!
//! Every extracted field maps to an ordered list of strategies; the first
//! strategy that yields a non-empty value wins. Markup changes on the site
//! are handled by editing this table (or loading a JSON override), not the
//! extractors.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::{Node, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Relative detail path on the card anchor itself.
    DetailLink,
    Title,
    Image,
    Address,
    Phone,
    InstagramLabel,
    InstagramUrl,
}

/// One way of reading a field: a selector plus what to read off the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    /// `None` reads the scope element itself.
    #[serde(default)]
    pub selector: Option<String>,
    /// Attribute to read; text content when absent.
    #[serde(default)]
    pub attribute: Option<String>,
}

impl SelectorStrategy {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            attribute: None,
        }
    }

    pub fn attribute(selector: &str, attribute: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            attribute: Some(attribute.to_string()),
        }
    }

    /// Attribute of the scope element.
    pub fn own_attribute(attribute: &str) -> Self {
        Self {
            selector: None,
            attribute: Some(attribute.to_string()),
        }
    }

    async fn read<N: Node>(&self, node: &N) -> Result<Option<String>, ScraperError> {
        let raw = match &self.attribute {
            Some(name) => node.attribute(name).await?,
            None => node.text().await?,
        };
        Ok(raw
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorTable {
    /// Listing cards, one per restaurant.
    pub cards: String,
    /// Waited on before enumerating cards.
    pub cards_ready: String,
    /// Waited on before reading a detail page.
    pub detail_ready: String,
    pub fields: BTreeMap<FieldName, Vec<SelectorStrategy>>,
}

impl Default for SelectorTable {
    fn default() -> Self {
        const DETAIL_INFO: &str = "main > div > section > div:nth-child(2)";

        let mut fields = BTreeMap::new();
        fields.insert(
            FieldName::DetailLink,
            vec![SelectorStrategy::own_attribute("href")],
        );
        fields.insert(
            FieldName::Title,
            vec![
                SelectorStrategy::text("article > div:nth-child(2) > p"),
                SelectorStrategy::text("article p"),
            ],
        );
        fields.insert(
            FieldName::Image,
            vec![
                SelectorStrategy::attribute("article > div:nth-child(1) > img", "src"),
                SelectorStrategy::attribute("article img", "src"),
            ],
        );
        fields.insert(
            FieldName::Address,
            vec![SelectorStrategy::text(&format!(
                "{} > div:nth-child(1) > a[href*=\"google.com/maps\"] > p",
                DETAIL_INFO
            ))],
        );
        fields.insert(
            FieldName::Phone,
            vec![SelectorStrategy::text(&format!(
                "{} > div:nth-child(2) > a[href^=\"tel:\"] > p",
                DETAIL_INFO
            ))],
        );
        fields.insert(
            FieldName::InstagramLabel,
            vec![SelectorStrategy::text(&format!(
                "{} > div:nth-child(3) > a[href*=\"instagram.com\"] > p",
                DETAIL_INFO
            ))],
        );
        fields.insert(
            FieldName::InstagramUrl,
            vec![SelectorStrategy::attribute(
                &format!("{} > div:nth-child(3) > a[href*=\"instagram.com\"]", DETAIL_INFO),
                "href",
            )],
        );

        Self {
            cards: "a[href^=\"/restaurant/\"]".to_string(),
            cards_ready: "div > section > div > a[href^=\"/restaurant/\"]".to_string(),
            detail_ready: format!("{} a[href*=\"google.com/maps\"]", DETAIL_INFO),
            fields,
        }
    }
}

impl SelectorTable {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScraperError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table: SelectorTable = serde_json::from_str(&text)?;
        table.validate()?;
        Ok(table)
    }

    /// Every field needs at least one strategy.
    pub fn validate(&self) -> Result<(), ScraperError> {
        for field in [
            FieldName::DetailLink,
            FieldName::Title,
            FieldName::Image,
            FieldName::Address,
            FieldName::Phone,
            FieldName::InstagramLabel,
            FieldName::InstagramUrl,
        ] {
            if self.strategies(field).is_empty() {
                return Err(ScraperError::Config(format!(
                    "no selector strategy for {:?}",
                    field
                )));
            }
        }
        Ok(())
    }

    pub fn strategies(&self, field: FieldName) -> &[SelectorStrategy] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tries each strategy for `field` in order against `scope`.
    ///
    /// Returns the first trimmed, non-empty value. Query errors propagate;
    /// a strategy that simply matches nothing falls through to the next.
    pub async fn resolve<S: Scope>(
        &self,
        scope: &S,
        field: FieldName,
    ) -> Result<Option<String>, ScraperError> {
        for (i, strategy) in self.strategies(field).iter().enumerate() {
            let Some(selector) = &strategy.selector else {
                // Scope-level strategies only make sense on an element; pages
                // have no attributes of their own.
                continue;
            };
            let value = match scope.find(selector).await? {
                Some(node) => strategy.read(&node).await?,
                None => None,
            };
            if value.is_some() {
                debug!("{:?} resolved by strategy {} ({})", field, i + 1, selector);
                return Ok(value);
            }
        }
        Ok(None)
    }

    /// Like [`resolve`](Self::resolve), but also honors strategies that read
    /// the element itself.
    pub async fn resolve_on<N: Node>(
        &self,
        node: &N,
        field: FieldName,
    ) -> Result<Option<String>, ScraperError> {
        for strategy in self.strategies(field) {
            let value = match &strategy.selector {
                None => strategy.read(node).await?,
                Some(selector) => match node.find(selector).await? {
                    Some(found) => strategy.read(&found).await?,
                    None => None,
                },
            };
            if value.is_some() {
                return Ok(value);
            }
        }
        Ok(None)
    }
}
