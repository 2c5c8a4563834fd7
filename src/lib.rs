//! Pricewatch - retail price tracking
//!
//! Resolves the cheapest current price for each catalog product across its
//! retail sources and maintains a deduplicating price-history ledger.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export the types most callers need
pub use domain::history::{compute_stats, PriceHistory, PriceStats};
pub use domain::pricing::{select_best, OfferResolver, PriceExtractor};
pub use infrastructure::render::{HttpRenderer, PageProvider, RenderedPage};
pub use shared::config::Config;
pub use shared::types::{BestOffer, Product, ProductReport, ResolvedOffer, RunSnapshot, Source};
