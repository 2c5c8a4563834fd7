//! Offer resolution for a single (product, source) pair
//!
//! Every terminal outcome - priced, blocked, not found, provider failure -
//! becomes a `ResolvedOffer`. Nothing propagates past this boundary, so one
//! bad source can never take down a run.

use std::time::Duration;

use tracing::{debug, warn};

use super::extract::PriceExtractor;
use crate::infrastructure::render::{PageProvider, RenderedPage};
use crate::shared::config::DetectCfg;
use crate::shared::errors::OfferError;
use crate::shared::types::{ResolvedOffer, Source};

pub struct OfferResolver {
    extractor: PriceExtractor,
    /// Pre-lowered anti-bot keywords
    blocked_keywords: Vec<String>,
    timeout: Duration,
}

impl OfferResolver {
    pub fn new(detect: DetectCfg, timeout: Duration) -> Self {
        let blocked_keywords = detect
            .blocked_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            extractor: PriceExtractor::new(detect),
            blocked_keywords,
            timeout,
        }
    }

    /// Resolve one source. Always returns an offer; failures surface as the
    /// diagnostic string, optionally tagged with a capture-artifact
    /// reference produced by the provider.
    pub async fn resolve_offer(
        &self,
        source: &Source,
        provider: &dyn PageProvider,
    ) -> ResolvedOffer {
        let mut offer = ResolvedOffer {
            store: source.store.clone(),
            url: source.url.clone(),
            price: None,
            title: None,
            diagnostic: None,
        };

        let page = match provider.render(&source.url, self.timeout).await {
            Ok(page) => page,
            Err(err) => {
                warn!("provider failure for {}: {}", source.url, err);
                offer.diagnostic = Some(OfferError::Provider(err.to_string()).to_string());
                return offer;
            }
        };

        offer.title = page.title().map(|t| t.to_string());

        // Blocked classification takes precedence over extraction: a
        // challenge page may well contain something that parses as a price.
        if let Some(keyword) = self.blocked_keyword(page.as_ref()) {
            warn!("source {} looks blocked (keyword {:?})", source.url, keyword);
            offer.diagnostic = Some(with_capture(
                OfferError::Blocked(keyword).to_string(),
                page.as_ref(),
            ));
            return offer;
        }

        match self.extractor.extract_price(page.as_ref()) {
            Some(price) => {
                debug!("{} priced at {} via {}", source.store, price, source.url);
                offer.price = Some(price);
            }
            None => {
                offer.diagnostic = Some(with_capture(
                    OfferError::NotFound.to_string(),
                    page.as_ref(),
                ));
            }
        }
        offer
    }

    fn blocked_keyword(&self, page: &dyn RenderedPage) -> Option<String> {
        let title = page.title().unwrap_or_default().to_lowercase();
        let body = page.visible_text().to_lowercase();
        self.blocked_keywords
            .iter()
            .find(|k| title.contains(k.as_str()) || body.contains(k.as_str()))
            .cloned()
    }
}

fn with_capture(diagnostic: String, page: &dyn RenderedPage) -> String {
    match page.capture_reference() {
        Some(reference) => format!("{diagnostic} [capture: {reference}]"),
        None => diagnostic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::render::{FetchedPage, ProviderError};
    use async_trait::async_trait;

    struct StaticProvider {
        html: String,
        capture: Option<String>,
    }

    #[async_trait]
    impl PageProvider for StaticProvider {
        async fn render(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<Box<dyn RenderedPage>, ProviderError> {
            Ok(Box::new(FetchedPage::with_capture(
                &self.html,
                self.capture.clone(),
            )))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl PageProvider for FailingProvider {
        async fn render(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<Box<dyn RenderedPage>, ProviderError> {
            Err(ProviderError::Network("connection reset".to_string()))
        }
    }

    fn resolver() -> OfferResolver {
        OfferResolver::new(DetectCfg::default(), Duration::from_secs(1))
    }

    fn source() -> Source {
        Source {
            store: "teststore".to_string(),
            url: "https://example.com/item".to_string(),
        }
    }

    #[tokio::test]
    async fn priced_page_yields_a_clean_offer() {
        let provider = StaticProvider {
            html: r#"<html><head><title>Ürün</title>
                <meta property="product:price:amount" content="1500,00">
                </head><body>ok</body></html>"#
                .to_string(),
            capture: None,
        };
        let offer = resolver().resolve_offer(&source(), &provider).await;
        assert_eq!(offer.price, Some(1500.0));
        assert_eq!(offer.title.as_deref(), Some("Ürün"));
        assert!(offer.diagnostic.is_none());
    }

    #[tokio::test]
    async fn blocked_page_wins_over_a_present_price() {
        let provider = StaticProvider {
            html: r#"<body>Please solve this CAPTCHA to continue. ₺1.500,00</body>"#
                .to_string(),
            capture: None,
        };
        let offer = resolver().resolve_offer(&source(), &provider).await;
        assert_eq!(offer.price, None);
        let diagnostic = offer.diagnostic.unwrap();
        assert!(diagnostic.contains("blocked"), "got: {diagnostic}");
    }

    #[tokio::test]
    async fn missing_price_is_reported_not_raised() {
        let provider = StaticProvider {
            html: "<body>just words, no numbers</body>".to_string(),
            capture: Some("capture-001.html".to_string()),
        };
        let offer = resolver().resolve_offer(&source(), &provider).await;
        assert_eq!(offer.price, None);
        let diagnostic = offer.diagnostic.unwrap();
        assert!(diagnostic.contains("price not found"));
        assert!(diagnostic.contains("capture-001.html"));
    }

    #[tokio::test]
    async fn provider_failure_becomes_a_diagnostic() {
        let offer = resolver().resolve_offer(&source(), &FailingProvider).await;
        assert_eq!(offer.price, None);
        let diagnostic = offer.diagnostic.unwrap();
        assert!(diagnostic.contains("provider failure"));
        assert!(diagnostic.contains("connection reset"));
    }
}
