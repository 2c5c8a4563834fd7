//! Price-history persistence with a canonicalizing reader
//!
//! The history file shape changed over the project's life. Instead of
//! scattering special cases through consumers, reading goes through an
//! ordered list of shape-detection rules: each either produces the canonical
//! ledger or declines, and the first match wins. A present but unrecognized
//! file is a hard error - overwriting it would destroy history.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::history::{HistoryEntry, PriceHistory};
use crate::domain::pricing::parse_amount;
use crate::shared::errors::AppError;

/// Canonical on-disk shape
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    updated_at: DateTime<Utc>,
    products: BTreeMap<String, Vec<HistoryEntry>>,
}

/// Entry shape written by early revisions: a single timestamp, `site` for
/// the store label, and the price occasionally kept as the scraped string
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    price: Value,
    #[serde(alias = "site")]
    store: String,
    #[serde(default)]
    url: String,
    #[serde(alias = "date")]
    seen_at: DateTime<Utc>,
}

type ShapeRule = fn(&Value) -> Option<PriceHistory>;

/// Shape-detection rules, newest layout first
const SHAPE_RULES: &[(&str, ShapeRule)] = &[
    ("canonical", read_canonical),
    ("bare-map", read_bare_map),
    ("legacy", read_legacy),
];

/// Load the ledger. An absent or empty file initializes an empty ledger;
/// that is the normal first-run case, not an error.
pub fn load_history(path: &Path) -> Result<PriceHistory, AppError> {
    if !path.exists() {
        info!("no history file at {}; starting empty", path.display());
        return Ok(PriceHistory::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::StorageError(format!("read {}: {}", path.display(), e)))?;
    if raw.trim().is_empty() {
        return Ok(PriceHistory::new());
    }
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::StorageError(format!("parse {}: {}", path.display(), e)))?;

    for (name, rule) in SHAPE_RULES {
        if let Some(history) = rule(&value) {
            debug!("history file matched the {} shape", name);
            return Ok(history);
        }
    }
    Err(AppError::StorageError(format!(
        "unrecognized history shape in {}",
        path.display()
    )))
}

/// Persist the ledger in the canonical shape, atomically replacing the
/// previous file.
pub fn save_history(
    path: &Path,
    history: &PriceHistory,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let file = HistoryFile {
        updated_at: now,
        products: history.products().clone(),
    };
    super::write_json_atomic(path, &file)
}

fn read_canonical(value: &Value) -> Option<PriceHistory> {
    let file: HistoryFile = serde_json::from_value(value.clone()).ok()?;
    Some(PriceHistory::from_parts(
        file.products,
        Some(file.updated_at),
    ))
}

// Early layout without the wrapper object: product id straight to entries.
fn read_bare_map(value: &Value) -> Option<PriceHistory> {
    let products: BTreeMap<String, Vec<HistoryEntry>> =
        serde_json::from_value(value.clone()).ok()?;
    Some(PriceHistory::from_parts(products, None))
}

fn read_legacy(value: &Value) -> Option<PriceHistory> {
    let (products_value, updated_at) = match value.get("products") {
        Some(products) if products.is_object() => (
            products,
            value
                .get("updated_at")
                .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok()),
        ),
        _ => (value, None),
    };

    let map = products_value.as_object()?;
    let mut products = BTreeMap::new();
    for (id, entries_value) in map {
        let legacy: Vec<LegacyEntry> =
            serde_json::from_value(entries_value.clone()).ok()?;
        let mut entries = Vec::with_capacity(legacy.len());
        for entry in legacy {
            let price = match legacy_price(&entry.price) {
                Ok(price) => price,
                Err(err) => {
                    warn!("legacy history entry for {} rejected: {}", id, err);
                    return None;
                }
            };
            entries.push(HistoryEntry {
                price,
                store: entry.store,
                url: entry.url,
                first_seen_at: entry.seen_at,
                last_seen_at: entry.seen_at,
            });
        }
        products.insert(id.clone(), entries);
    }
    Some(PriceHistory::from_parts(products, updated_at))
}

fn legacy_price(value: &Value) -> Result<f64, AppError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| AppError::StorageError(format!("invalid price {n}"))),
        // Scraped strings went to disk unparsed in the earliest revisions
        Value::String(s) => parse_amount(s)
            .map_err(|e| AppError::StorageError(e.to_string()))
            .and_then(|p| {
                (p > 0.0)
                    .then_some(p)
                    .ok_or_else(|| AppError::StorageError(format!("non-positive price {s:?}")))
            }),
        other => Err(AppError::StorageError(format!(
            "unsupported price value {other}"
        ))),
    }
}
