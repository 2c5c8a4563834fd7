//! Rendering capability - the "fetch a URL, expose its content" seam
//!
//! The resolution pipeline only ever talks to these two traits, so tests
//! can supply an in-memory implementation with zero I/O.

mod http_provider;
mod page;

pub use http_provider::HttpRenderer;
pub use page::FetchedPage;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failures reaching or reading a source page
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("navigation timeout after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0} for {1}")]
    Status(u16, String),

    #[error("provider startup failed: {0}")]
    Startup(String),
}

/// Renders a URL into a page within a bounded wait budget
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn render(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn RenderedPage>, ProviderError>;
}

/// Read-only view of a rendered page
pub trait RenderedPage: Send + Sync {
    /// Value of a named price-bearing metadata attribute, if present
    fn meta_content(&self, field: &str) -> Option<&str>;

    /// Raw embedded structured-data blocks, in document order
    fn structured_data_blocks(&self) -> &[String];

    /// Tag-stripped visible text of the page
    fn visible_text(&self) -> &str;

    fn title(&self) -> Option<&str>;

    /// Reference to an externally captured debug artifact, when one exists
    fn capture_reference(&self) -> Option<&str>;
}
