//! Detail page extraction

use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::selectors::FieldName;
use crate::traits::{Session, Tab};

use super::types::{DetailFields, SocialLink};

const INSTAGRAM: &str = "instagram";

/// Visits `detail_url` in a tab of its own and reads address, phone and
/// social links.
///
/// Every failure degrades to empty fields. The tab is closed before
/// returning whatever happened inside it.
pub async fn extract_detail<S: Session>(
    session: &S,
    detail_url: &str,
    config: &ScraperConfig,
) -> DetailFields {
    let tab = match session.open_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            warn!("Could not open tab for {}: {}", detail_url, e);
            return DetailFields::default();
        }
    };

    let fields = read_detail(&tab, detail_url, config).await;

    if let Err(e) = tab.close().await {
        debug!("Failed to close detail tab: {}", e);
    }

    fields
}

async fn read_detail<T: Tab>(tab: &T, detail_url: &str, config: &ScraperConfig) -> DetailFields {
    let mut fields = DetailFields::default();

    info!("Visiting detail page {}", detail_url);
    if let Err(e) = tab.goto(detail_url, config.navigation_timeout).await {
        warn!("Detail page unavailable, leaving fields empty: {}", e);
        return fields;
    }

    let selectors = &config.selectors;
    match tab.wait_for(&selectors.detail_ready, config.selector_timeout).await {
        Ok(()) => {}
        Err(e) if e.is_timeout() => warn!("{}, extracting whatever rendered", e),
        Err(e) => warn!("Waiting on {} failed, extracting whatever rendered: {}", detail_url, e),
    }

    match selectors.resolve(tab, FieldName::Address).await {
        Ok(Some(address)) => fields.address = address,
        Ok(None) => info!("No address on {}", detail_url),
        Err(e) => warn!("Address lookup failed on {}: {}", detail_url, e),
    }

    let label = selectors.resolve(tab, FieldName::InstagramLabel).await;
    let url = selectors.resolve(tab, FieldName::InstagramUrl).await;
    match (label, url) {
        (Ok(Some(label)), Ok(Some(url))) => {
            debug!("Instagram {} -> {}", label, url);
            fields.social_links.push(SocialLink {
                url,
                platform: INSTAGRAM.to_string(),
            });
        }
        (Err(e), _) | (_, Err(e)) => warn!("Instagram lookup failed on {}: {}", detail_url, e),
        _ => info!("No Instagram link on {}", detail_url),
    }

    match selectors.resolve(tab, FieldName::Phone).await {
        Ok(Some(phone)) => fields.phone = phone,
        Ok(None) => info!("No phone on {}", detail_url),
        Err(e) => warn!("Phone lookup failed on {}: {}", detail_url, e),
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail_page, FakeSession, FakeSite};

    const URL: &str = "https://www.halaljoints.com/restaurant/apple-kebab";

    #[tokio::test]
    async fn test_reads_all_fields() {
        let session = FakeSession::new(FakeSite::new().page(
            URL,
            detail_page(
                Some("1 High St"),
                Some("020 7946 0000"),
                Some(("@applekebab", "https://instagram.com/applekebab")),
            ),
        ));

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(fields.address, "1 High St");
        assert_eq!(fields.phone, "020 7946 0000");
        assert_eq!(
            fields.social_links,
            vec![SocialLink {
                url: "https://instagram.com/applekebab".to_string(),
                platform: "instagram".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_only_address_resolves() {
        let session =
            FakeSession::new(FakeSite::new().page(URL, detail_page(Some("1 High St"), None, None)));

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(
            fields,
            DetailFields {
                address: "1 High St".to_string(),
                phone: String::new(),
                social_links: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_field_failures_do_not_cascade() {
        let address_selector = ScraperConfig::default()
            .selectors
            .strategies(FieldName::Address)[0]
            .selector
            .clone()
            .unwrap();
        let page = detail_page(Some("ignored"), Some("020 7946 0001"), None).broken(&address_selector);
        let session = FakeSession::new(FakeSite::new().page(URL, page));

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(fields.address, "");
        assert_eq!(fields.phone, "020 7946 0001");
    }

    #[tokio::test]
    async fn test_instagram_needs_label_and_url() {
        let label_only = detail_page(None, None, None).child(
            &ScraperConfig::default()
                .selectors
                .strategies(FieldName::InstagramLabel)[0]
                .selector
                .clone()
                .unwrap(),
            crate::testing::FakeNode::with_text("@nolink"),
        );
        let session = FakeSession::new(FakeSite::new().page(URL, label_only));

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert!(fields.social_links.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_failure_is_empty_and_closes_tab() {
        let session = FakeSession::new(FakeSite::new());

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(fields, DetailFields::default());
        assert_eq!(session.counters.opened(), 1);
        assert_eq!(session.counters.closed(), 1);
    }

    #[tokio::test]
    async fn test_missing_ready_marker_still_extracts() {
        // No address, so the ready marker never renders.
        let session = FakeSession::new(
            FakeSite::new().page(URL, detail_page(None, Some("07700 900123"), None)),
        );

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(fields.phone, "07700 900123");
        assert_eq!(session.counters.closed(), 1);
    }

    #[tokio::test]
    async fn test_tab_open_failure_is_empty() {
        let session = FakeSession::new(FakeSite::new().page(URL, detail_page(Some("1 High St"), None, None)))
            .failing_tabs();

        let fields = extract_detail(&session, URL, &ScraperConfig::default()).await;

        assert_eq!(fields, DetailFields::default());
    }
}
