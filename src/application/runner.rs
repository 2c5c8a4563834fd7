//! One full tracking run: catalog in, snapshot and history out
//!
//! Sources are fetched strictly one at a time with a fixed pause between
//! them. Slower, but a steady cadence keeps the retail sites from rate
//! limiting a whole run into uselessness.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::history::{compute_stats, PriceHistory};
use crate::domain::pricing::{select_best, OfferResolver};
use crate::infrastructure::catalog::load_catalog;
use crate::infrastructure::render::{HttpRenderer, PageProvider};
use crate::infrastructure::storage::history_store::{load_history, save_history};
use crate::infrastructure::storage::save_snapshot;
use crate::shared::config::Config;
use crate::shared::types::{Product, ProductReport, ResolvedOffer, RunSnapshot};

/// Execute a full run against the configured catalog.
///
/// With `dry_run` set, everything is resolved and logged but nothing is
/// written to disk.
pub async fn run(config: Config, dry_run: bool) -> Result<()> {
    let catalog = load_catalog(Path::new(&config.output.catalog_path))
        .context("load product catalog")?;
    info!("catalog loaded: {} products", catalog.len());

    let mut history = load_history(Path::new(&config.output.history_path))
        .context("load price history")?;

    let renderer = HttpRenderer::new(&config.fetch).context("initialize page provider")?;
    let snapshot = resolve_catalog(&catalog, &renderer, &config, &mut history).await;

    for report in &snapshot.products {
        if let Some(stats) = compute_stats(history.entries(&report.id)) {
            info!(
                "{}: now {:?}, min {}, max {}, change {:?}%",
                report.id,
                report.best.as_ref().map(|b| b.price),
                stats.min.price,
                stats.max.price,
                stats.change_percent,
            );
        }
    }

    if dry_run {
        info!("dry run; skipping snapshot and history writes");
        return Ok(());
    }

    save_snapshot(Path::new(&config.output.snapshot_path), &snapshot)
        .context("write run snapshot")?;
    save_history(
        Path::new(&config.output.history_path),
        &history,
        snapshot.updated_at,
    )
    .context("write price history")?;
    info!("snapshot written to {}", config.output.snapshot_path);
    Ok(())
}

/// Resolve every source of every product, in catalog order, and fold the
/// results into the history ledger. Never fails: per-source trouble stays in
/// the offer diagnostics.
pub async fn resolve_catalog(
    catalog: &[Product],
    provider: &dyn PageProvider,
    config: &Config,
    history: &mut PriceHistory,
) -> RunSnapshot {
    let resolver = OfferResolver::new(
        config.detect.clone(),
        Duration::from_secs(config.fetch.timeout_secs),
    );
    let delay = Duration::from_millis(config.fetch.delay_ms);
    let mut first_fetch = true;

    let mut products = Vec::with_capacity(catalog.len());
    for product in catalog {
        info!("resolving {} ({} sources)", product.id, product.sources.len());
        let mut offers = Vec::with_capacity(product.sources.len());
        for source in &product.sources {
            if !first_fetch && !delay.is_zero() {
                sleep(delay).await;
            }
            first_fetch = false;
            offers.push(resolver.resolve_offer(source, provider).await);
        }

        let best = select_best(&offers);
        let error = match &best {
            Some(best) => {
                info!("{}: best {} at {}", product.id, best.price, best.store);
                None
            }
            None => {
                warn!("{}: no source produced a price", product.id);
                Some(summarize_failures(&offers))
            }
        };
        history.ingest(&product.id, best.as_ref(), Utc::now());

        products.push(ProductReport {
            id: product.id.clone(),
            name: product.name.clone(),
            best,
            offers,
            error,
        });
    }

    RunSnapshot {
        updated_at: Utc::now(),
        products,
    }
}

fn summarize_failures(offers: &[ResolvedOffer]) -> String {
    let parts: Vec<String> = offers
        .iter()
        .filter_map(|o| {
            o.diagnostic
                .as_ref()
                .map(|d| format!("{}: {}", o.store, d))
        })
        .collect();
    if parts.is_empty() {
        "no priced source".to_string()
    } else {
        parts.join("; ")
    }
}
