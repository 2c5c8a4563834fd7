use anyhow::Result;
use clap::Parser;

use pricewatch::application;
use pricewatch::shared::config::Config;

#[derive(Parser, Debug)]
#[command(version, about = "Cheapest-price tracker for a retail product catalog")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Product catalog path (overrides config)
    #[arg(long)]
    catalog: Option<String>,

    /// Snapshot output path (overrides config)
    #[arg(long)]
    snapshot_out: Option<String>,

    /// History ledger path (overrides config)
    #[arg(long)]
    history_out: Option<String>,

    /// Per-page fetch timeout in seconds (overrides config)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Pause between source fetches in milliseconds (overrides config)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Resolve everything but write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    // Priority: CLI args > config file > defaults
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(catalog) = args.catalog {
        config.output.catalog_path = catalog;
    }
    if let Some(snapshot_out) = args.snapshot_out {
        config.output.snapshot_path = snapshot_out;
    }
    if let Some(history_out) = args.history_out {
        config.output.history_path = history_out;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.fetch.timeout_secs = timeout_secs;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.fetch.delay_ms = delay_ms;
    }

    application::run(config, args.dry_run).await
}
