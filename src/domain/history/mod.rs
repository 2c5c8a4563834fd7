//! History domain - price observation ledger and derived statistics

mod ledger;
mod stats;

pub use ledger::{PriceHistory, MAX_ENTRIES_PER_PRODUCT};
pub use stats::{compute_stats, percent_change, PriceStats};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A distinct observed (price, store) regime.
///
/// One entry spans every consecutive run that saw the same price at the same
/// store; it is not a sampling tick. `first_seen_at <= last_seen_at` always.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub price: f64,
    pub store: String,
    pub url: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}
