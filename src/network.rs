//! Network and path defaults for the monitor.

/// Default Solana RPC URL.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default listen address for the HTTP API and page.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
