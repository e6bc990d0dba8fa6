//! # Stork Price Monitor
//!
//! Samples Stork price-feed accounts on Solana, keeps the latest value per
//! asset in a shared table and republishes it to the console and over HTTP.
//!
//! ## Modules
//!
//! - [`program`]: feed account derivation, decoding and fetching
//! - [`feed`]: the shared latest-value table and the periodic sampler
//! - [`presenter`]: console and HTTP views of the table
//! - [`config`]: JSON configuration loading and validation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stork_price_monitor::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let feeds = config.derive_feeds()?;
//!     let table = FeedTable::new(config.asset_names());
//!
//!     let client = StorkRpcClient::new(&config.rpc_url);
//!     let sampler = Sampler::new(feeds, Arc::new(client), table.clone(), config.update_interval()?);
//!
//!     tokio::spawn(serve(config.http_addr()?, table));
//!     sampler.run(|_, _| {}).await;
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Feed account derivation, decoding and fetching.
pub mod program;

/// Latest-value table and sampler.
pub mod feed;

/// Console and HTTP views.
pub mod presenter;

/// Configuration loading.
pub mod config;

/// Network and path defaults.
pub mod network;

/// Tracing subscriber setup.
pub mod logging;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::program::{
        derive_feeds, get_feed_pda, parse_encoded_asset_id, AccountSource, DerivedFeed,
        FeedError, FeedResult, InMemoryAccountSource, TemporalNumericValue,
        TemporalNumericValueFeed, PRICE_DECIMALS, STORK_FEED_SEED,
    };

    #[cfg(feature = "rpc")]
    pub use crate::program::StorkRpcClient;

    pub use crate::feed::{FeedTable, PriceFeedEntry, SampleOutcome, Sampler, SkipReason, TickReport};

    pub use crate::presenter::{
        build_router, format_price, format_timestamp_ns, render_snapshot, serve,
    };

    pub use crate::config::{parse_duration, AssetConfig, Config, ConfigError};

    pub use crate::network::{DEFAULT_CONFIG_PATH, DEFAULT_HTTP_ADDR, DEFAULT_RPC_URL};
}
