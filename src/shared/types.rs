//! Common types used across the application

use serde::{Deserialize, Serialize};

/// One retail listing of a product.
///
/// The `site` alias matches the key used by older catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    #[serde(alias = "site")]
    pub store: String,
    pub url: String,
}

/// Catalog entry; immutable during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "akakce_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_url: Option<String>,
    #[serde(alias = "offers")]
    pub sources: Vec<Source>,
}

/// Outcome of attempting to price one source in one run.
///
/// `price` is `None` when no extraction strategy succeeded; the diagnostic
/// (serialized as `error`) says why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedOffer {
    pub store: String,
    pub url: String,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "error", skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// The cheapest resolved offer for a product in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOffer {
    pub price: f64,
    pub store: String,
    pub url: String,
}

/// Per-product section of the run snapshot.
///
/// `error` is set exactly when `best` is absent; a product with no priced
/// source still appears here, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReport {
    pub id: String,
    pub name: String,
    pub best: Option<BestOffer>,
    pub offers: Vec<ResolvedOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Point-in-time result of a full run; wholly replaces the previous one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub products: Vec<ProductReport>,
}
