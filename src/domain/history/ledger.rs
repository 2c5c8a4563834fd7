//! Append-only, deduplicating, capacity-bounded price history

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::HistoryEntry;
use crate::shared::types::BestOffer;

/// Hard cap per product; the oldest observations are dropped first
pub const MAX_ENTRIES_PER_PRODUCT: usize = 200;

/// Per-product history sequences, ordered oldest to newest.
///
/// The only state that outlives a run: loaded once at run start, mutated in
/// memory by the single thread of control, written back once at run end.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    products: BTreeMap<String, Vec<HistoryEntry>>,
    updated_at: Option<DateTime<Utc>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        products: BTreeMap<String, Vec<HistoryEntry>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            products,
            updated_at,
        }
    }

    pub fn products(&self) -> &BTreeMap<String, Vec<HistoryEntry>> {
        &self.products
    }

    pub fn entries(&self, product_id: &str) -> &[HistoryEntry] {
        self.products
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Record a run's best offer for a product.
    ///
    /// A run without a price is a no-op - it never erases or corrupts what
    /// is already known. A repeat of the current (price, store) regime only
    /// advances `last_seen_at`; anything else appends, and the sequence is
    /// then re-capped from the front.
    pub fn ingest(
        &mut self,
        product_id: &str,
        observed: Option<&BestOffer>,
        now: DateTime<Utc>,
    ) {
        let Some(best) = observed else {
            return;
        };

        let entries = self.products.entry(product_id.to_string()).or_default();
        if let Some(last) = entries.last_mut() {
            if last.price == best.price && last.store == best.store {
                last.last_seen_at = now;
                last.url = best.url.clone();
                self.updated_at = Some(now);
                return;
            }
        }

        entries.push(HistoryEntry {
            price: best.price,
            store: best.store.clone(),
            url: best.url.clone(),
            first_seen_at: now,
            last_seen_at: now,
        });
        if entries.len() > MAX_ENTRIES_PER_PRODUCT {
            let excess = entries.len() - MAX_ENTRIES_PER_PRODUCT;
            entries.drain(..excess);
            debug!(
                "history for {} capped at {} entries ({} dropped)",
                product_id, MAX_ENTRIES_PER_PRODUCT, excess
            );
        }
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn best(price: f64, store: &str) -> BestOffer {
        BestOffer {
            price,
            store: store.to_string(),
            url: format!("https://example.com/{store}"),
        }
    }

    #[test]
    fn absent_best_offer_is_a_noop() {
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p1", None, at(1));
        assert_eq!(history.entries("p1").len(), 1);
        assert_eq!(history.entries("p1")[0].last_seen_at, at(0));
    }

    #[test]
    fn repeated_regime_merges_instead_of_appending() {
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p1", Some(&best(100.0, "a")), at(5));

        let entries = history.entries("p1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].first_seen_at, at(0));
        assert_eq!(entries[0].last_seen_at, at(5));
    }

    #[test]
    fn price_change_appends_a_new_entry() {
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p1", Some(&best(90.0, "a")), at(1));
        assert_eq!(history.entries("p1").len(), 2);
        assert_eq!(history.entries("p1")[1].price, 90.0);
    }

    #[test]
    fn store_change_appends_even_at_the_same_price() {
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p1", Some(&best(100.0, "b")), at(1));
        assert_eq!(history.entries("p1").len(), 2);
    }

    #[test]
    fn merge_only_looks_at_the_final_entry() {
        // a -> b -> a again: the old "a" regime ended, so a new entry starts
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p1", Some(&best(95.0, "b")), at(1));
        history.ingest("p1", Some(&best(100.0, "a")), at(2));
        assert_eq!(history.entries("p1").len(), 3);
    }

    #[test]
    fn capacity_drops_the_oldest_entries() {
        let mut history = PriceHistory::new();
        for i in 0..=MAX_ENTRIES_PER_PRODUCT {
            history.ingest("p1", Some(&best(1.0 + i as f64, "a")), at(0));
        }
        let entries = history.entries("p1");
        assert_eq!(entries.len(), MAX_ENTRIES_PER_PRODUCT);
        // entry for price 1.0 (the first observation) was evicted
        assert_eq!(entries[0].price, 2.0);
        assert_eq!(entries.last().unwrap().price, 1.0 + MAX_ENTRIES_PER_PRODUCT as f64);
    }

    #[test]
    fn products_are_independent() {
        let mut history = PriceHistory::new();
        history.ingest("p1", Some(&best(100.0, "a")), at(0));
        history.ingest("p2", Some(&best(200.0, "a")), at(0));
        assert_eq!(history.entries("p1").len(), 1);
        assert_eq!(history.entries("p2").len(), 1);
        assert!(history.entries("p3").is_empty());
    }
}
