//! `stork-monitor`: samples Stork feeds and serves the latest prices.
//!
//! Run: RUST_LOG=info stork-monitor --config config.json

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use stork_price_monitor::config::Config;
use stork_price_monitor::feed::{FeedTable, Sampler};
use stork_price_monitor::logging::init_tracing;
use stork_price_monitor::network::DEFAULT_CONFIG_PATH;
use stork_price_monitor::presenter::{render_snapshot, serve};
use stork_price_monitor::program::StorkRpcClient;

#[derive(Parser, Debug)]
#[command(name = "stork-monitor", version, about = "Stork price feed monitor")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, env = "STORK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the HTTP listen address from the config
    #[arg(long)]
    http_addr: Option<SocketAddr>,

    /// Console output only
    #[arg(long, default_value_t = false)]
    no_http: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let period = config.update_interval().context("Invalid update frequency")?;
    let feeds = config.derive_feeds().context("Failed to derive feed accounts")?;
    for feed in &feeds {
        tracing::info!(asset = %feed.asset_name, account = %feed.address, "Tracking feed");
    }

    let table = FeedTable::new(config.asset_names());
    let client = StorkRpcClient::new(&config.rpc_url);
    let sampler = Sampler::new(feeds, Arc::new(client), table.clone(), period);

    if !cli.no_http {
        let addr = match cli.http_addr {
            Some(addr) => addr,
            None => config.http_addr()?,
        };
        let http_table = table.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(addr, http_table).await {
                tracing::error!("HTTP server stopped: {}", e);
            }
        });
    }

    tokio::select! {
        _ = sampler.run(|snapshot, report| {
            for (asset, reason) in &report.skipped {
                tracing::debug!(asset = %asset, reason = %reason, "Asset skipped this tick");
            }
            print!("{}", render_snapshot(snapshot, Utc::now()));
        }) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
