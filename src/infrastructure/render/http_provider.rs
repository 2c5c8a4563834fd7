//! HTTP-backed page provider
//!
//! Fetches a source page over plain HTTP and models it as a `FetchedPage`.
//! Pages that only expose their price through script execution simply
//! resolve as "price not found" downstream.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, warn};

use super::{FetchedPage, PageProvider, ProviderError, RenderedPage};
use crate::shared::config::FetchCfg;

pub struct HttpRenderer {
    client: Client,
    capture_dir: Option<PathBuf>,
}

impl HttpRenderer {
    /// Build the shared HTTP client. Failing here is fatal to the run: with
    /// no client, no source can be resolved at all.
    pub fn new(fetch: &FetchCfg) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            fetch
                .accept_language
                .parse()
                .map_err(|_| ProviderError::Startup("invalid accept-language value".to_string()))?,
        );
        let client = Client::builder()
            .user_agent(fetch.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Startup(e.to_string()))?;
        Ok(Self {
            client,
            capture_dir: fetch.capture_dir.as_ref().map(PathBuf::from),
        })
    }

    // Best-effort body dump for offline inspection; the returned file name
    // rides along on diagnostics. Capture failures only warn.
    fn capture(&self, url: &str, body: &str) -> Option<String> {
        let dir = self.capture_dir.as_ref()?;
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("cannot create capture dir {}: {}", dir.display(), e);
            return None;
        }
        let name = format!("capture-{}.html", Utc::now().format("%Y%m%dT%H%M%S%3f"));
        match std::fs::write(dir.join(&name), body) {
            Ok(()) => Some(name),
            Err(e) => {
                warn!("failed to capture body of {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl PageProvider for HttpRenderer {
    async fn render(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn RenderedPage>, ProviderError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16(), url.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        debug!("fetched {} ({} bytes)", url, body.len());

        let capture = self.capture(url, &body);
        Ok(Box::new(FetchedPage::with_capture(&body, capture)))
    }
}
