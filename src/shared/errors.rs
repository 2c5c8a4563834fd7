//! Error handling for the application

use thiserror::Error;

/// Per-offer failure taxonomy. These are rendered into the offer's
/// diagnostic string and never cross the resolver boundary.
#[derive(Error, Debug, Clone)]
pub enum OfferError {
    #[error("provider failure: {0}")]
    Provider(String),

    #[error("blocked: page matched anti-bot keyword {0:?}")]
    Blocked(String),

    #[error("price not found")]
    NotFound,

    #[error("unparsable amount {0:?}")]
    Parse(String),
}

/// Run-fatal application errors. Configuration and provider-startup
/// failures surface through their own types before a run begins.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}
