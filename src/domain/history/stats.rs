//! Derived statistics over a product's history sequence

use serde::Serialize;

use super::HistoryEntry;

/// Single-scan summary of a history sequence
#[derive(Debug, Clone, Serialize)]
pub struct PriceStats {
    pub count: usize,
    pub first: HistoryEntry,
    pub last: HistoryEntry,
    /// Second-to-last entry; absent when fewer than two exist
    pub previous: Option<HistoryEntry>,
    /// Lowest-priced entry; first such on ties
    pub min: HistoryEntry,
    /// Highest-priced entry; first such on ties
    pub max: HistoryEntry,
    /// Change from the first to the latest observed price, in percent
    pub change_percent: Option<f64>,
    /// Latest price minus the one before it
    pub last_delta: Option<f64>,
}

/// Summarize a sequence; `None` for an empty one.
pub fn compute_stats(entries: &[HistoryEntry]) -> Option<PriceStats> {
    let first = entries.first()?;
    let last = entries.last()?;
    let previous = (entries.len() >= 2).then(|| entries[entries.len() - 2].clone());

    let mut min = first;
    let mut max = first;
    for entry in entries {
        if entry.price < min.price {
            min = entry;
        }
        if entry.price > max.price {
            max = entry;
        }
    }

    Some(PriceStats {
        count: entries.len(),
        change_percent: percent_change(last.price, first.price),
        last_delta: previous.as_ref().map(|p| last.price - p.price),
        first: first.clone(),
        last: last.clone(),
        previous,
        min: min.clone(),
        max: max.clone(),
    })
}

/// Percent change from `base` to `current`; `None` when the base is zero or
/// either value is not a finite number.
pub fn percent_change(current: f64, base: f64) -> Option<f64> {
    if !current.is_finite() || !base.is_finite() || base == 0.0 {
        return None;
    }
    Some((current - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(price: f64, store: &str, minute: u32) -> HistoryEntry {
        let seen = Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap();
        HistoryEntry {
            price,
            store: store.to_string(),
            url: format!("https://example.com/{store}"),
            first_seen_at: seen,
            last_seen_at: seen,
        }
    }

    #[test]
    fn percent_change_basics() {
        assert_eq!(percent_change(120.0, 100.0), Some(20.0));
        assert_eq!(percent_change(80.0, 100.0), Some(-20.0));
        assert_eq!(percent_change(42.0, 0.0), None);
        assert_eq!(percent_change(f64::NAN, 100.0), None);
        assert_eq!(percent_change(100.0, f64::INFINITY), None);
    }

    #[test]
    fn empty_sequence_has_no_stats() {
        assert!(compute_stats(&[]).is_none());
    }

    #[test]
    fn single_entry_stats() {
        let stats = compute_stats(&[entry(100.0, "a", 0)]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.previous.is_none());
        assert!(stats.last_delta.is_none());
        assert_eq!(stats.change_percent, Some(0.0));
        assert_eq!(stats.min.price, 100.0);
        assert_eq!(stats.max.price, 100.0);
    }

    #[test]
    fn full_scan_finds_extremes_and_deltas() {
        let entries = [
            entry(100.0, "a", 0),
            entry(80.0, "b", 1),
            entry(140.0, "a", 2),
            entry(120.0, "c", 3),
        ];
        let stats = compute_stats(&entries).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.first.price, 100.0);
        assert_eq!(stats.last.price, 120.0);
        assert_eq!(stats.previous.as_ref().unwrap().price, 140.0);
        assert_eq!(stats.min.store, "b");
        assert_eq!(stats.max.store, "a");
        assert_eq!(stats.change_percent, Some(20.0));
        assert_eq!(stats.last_delta, Some(-20.0));
    }

    #[test]
    fn ties_keep_the_first_entry() {
        let entries = [
            entry(100.0, "early-min", 0),
            entry(100.0, "late-min", 1),
            entry(200.0, "early-max", 2),
            entry(200.0, "late-max", 3),
        ];
        let stats = compute_stats(&entries).unwrap();
        assert_eq!(stats.min.store, "early-min");
        assert_eq!(stats.max.store, "early-max");
    }
}
