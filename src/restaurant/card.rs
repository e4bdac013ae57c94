//! Listing card extraction

use tracing::{debug, info, warn};

use crate::clean::clean;
use crate::error::ScraperError;
use crate::selectors::{FieldName, SelectorTable};
use crate::traits::Node;

use super::types::{CardFields, CardOutcome, SkipReason};

/// Characters of card HTML logged when a title is missing.
const HTML_PREVIEW_CHARS: usize = 200;

/// Reads link, title and image off one card.
///
/// Never fails: query errors come back as [`CardOutcome::Failed`].
pub async fn extract_card<N: Node>(card: &N, selectors: &SelectorTable) -> CardOutcome {
    match try_extract_card(card, selectors).await {
        Ok(outcome) => outcome,
        Err(e) => CardOutcome::Failed(e),
    }
}

async fn try_extract_card<N: Node>(
    card: &N,
    selectors: &SelectorTable,
) -> Result<CardOutcome, ScraperError> {
    let detail_link = selectors.resolve_on(card, FieldName::DetailLink).await?;

    let title = selectors
        .resolve_on(card, FieldName::Title)
        .await?
        .map(|raw| clean(&raw))
        .filter(|title| !title.is_empty());

    let Some(title) = title else {
        info!("No title found for card {:?}", detail_link);
        log_card_html(card).await;
        return Ok(CardOutcome::Skipped(SkipReason::MissingTitle));
    };

    let Some(image_url) = selectors.resolve_on(card, FieldName::Image).await? else {
        info!("No image found for '{}'", title);
        return Ok(CardOutcome::Skipped(SkipReason::MissingImage));
    };

    debug!("Card resolved: {} | Image: {}", title, image_url);
    Ok(CardOutcome::Extracted(CardFields {
        title,
        image_url,
        detail_link,
    }))
}

async fn log_card_html<N: Node>(card: &N) {
    match card.outer_html().await {
        Ok(Some(html)) => {
            let preview: String = html.chars().take(HTML_PREVIEW_CHARS).collect();
            debug!("Card HTML structure: {}...", preview);
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to read card HTML: {}", e),
    }
}
