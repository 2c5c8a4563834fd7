//! Price extraction strategies
//!
//! Strategies are ordered from most structured to least, because retail
//! pages vary wildly in markup quality. The driver tries each in turn and
//! stops at the first strictly positive price; adding or reordering a
//! strategy is a data change in `STRATEGIES`, not a control-flow change.

use serde_json::Value;
use tracing::debug;

use super::currency::parse_localized_amount;
use crate::infrastructure::render::RenderedPage;
use crate::shared::config::DetectCfg;

type Strategy = fn(&PriceExtractor, &dyn RenderedPage) -> Option<f64>;

/// Ordered extraction strategies; first success wins
const STRATEGIES: &[(&str, Strategy)] = &[
    ("metadata", PriceExtractor::from_metadata),
    ("structured-data", PriceExtractor::from_structured_data),
    ("visible-text", PriceExtractor::from_visible_text),
];

/// Structured-data keys probed for an amount, most specific first
const PRICE_KEYS: &[&str] = &["price", "lowPrice", "highPrice"];

pub struct PriceExtractor {
    detect: DetectCfg,
}

impl PriceExtractor {
    pub fn new(detect: DetectCfg) -> Self {
        Self { detect }
    }

    /// Run the strategy cascade. `None` means "this page does not expose a
    /// price we can read" - an expected outcome, not an error.
    pub fn extract_price(&self, page: &dyn RenderedPage) -> Option<f64> {
        for (name, strategy) in STRATEGIES {
            if let Some(price) = strategy(self, page) {
                debug!("strategy {} extracted price {}", name, price);
                return Some(price);
            }
        }
        None
    }

    /// Strategy 1: price-bearing metadata attributes
    fn from_metadata(&self, page: &dyn RenderedPage) -> Option<f64> {
        for field in &self.detect.meta_price_fields {
            let Some(raw) = page.meta_content(field) else {
                continue;
            };
            if let Some(price) = parse_localized_amount(raw).filter(|p| *p > 0.0) {
                return Some(price);
            }
        }
        None
    }

    /// Strategy 2: embedded structured-data blocks, scanned recursively
    fn from_structured_data(&self, page: &dyn RenderedPage) -> Option<f64> {
        for block in page.structured_data_blocks() {
            let Ok(data) = serde_json::from_str::<Value>(block) else {
                continue;
            };
            if let Some(price) = scan_json_prices(&data) {
                return Some(price);
            }
        }
        None
    }

    /// Strategy 3: first currency-marked amount in the visible text
    fn from_visible_text(&self, page: &dyn RenderedPage) -> Option<f64> {
        scan_marked_amount(
            page.visible_text(),
            &self.detect.currency_markers,
            self.detect.visible_floor,
        )
    }
}

/// Depth-first scan for the first positive amount under a known price key.
/// Key lookup happens before recursing into child values, so a top-level
/// `price` beats one nested inside `offers`.
fn scan_json_prices(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => items.iter().find_map(scan_json_prices),
        Value::Object(map) => {
            for key in PRICE_KEYS {
                match map.get(*key) {
                    Some(Value::Number(n)) => {
                        if let Some(p) = n.as_f64().filter(|p| p.is_finite() && *p > 0.0) {
                            return Some(p);
                        }
                    }
                    Some(Value::String(s)) => {
                        // Structured data is machine-formatted: plain decimal
                        // with at most a comma standing in for the point, not
                        // the localized thousands notation.
                        if let Some(p) = s
                            .trim()
                            .replace(',', ".")
                            .parse::<f64>()
                            .ok()
                            .filter(|p| p.is_finite() && *p > 0.0)
                        {
                            return Some(p);
                        }
                    }
                    _ => {}
                }
            }
            map.values().find_map(scan_json_prices)
        }
        _ => None,
    }
}

/// First marker-introduced amount in document order that clears the floor
fn scan_marked_amount(text: &str, markers: &[String], floor: f64) -> Option<f64> {
    let lower = text.to_lowercase();
    let mut pos = 0;
    while pos < lower.len() {
        let Some((offset, marker_len)) = next_marker(&lower[pos..], markers) else {
            return None;
        };
        let after_marker = pos + offset + marker_len;
        let amount: String = lower[after_marker..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        if amount.chars().any(|c| c.is_ascii_digit()) {
            if let Some(price) =
                parse_localized_amount(&amount).filter(|p| *p > 0.0 && *p >= floor)
            {
                return Some(price);
            }
        }
        pos = after_marker;
    }
    None
}

fn next_marker(haystack: &str, markers: &[String]) -> Option<(usize, usize)> {
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .filter_map(|m| {
            let m = m.to_lowercase();
            haystack.find(&m).map(|i| (i, m.len()))
        })
        .min_by_key(|(i, _)| *i)
}
