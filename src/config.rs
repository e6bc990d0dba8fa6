//! Monitor configuration.
//!
//! Loaded once at startup from a JSON file. Every invalid field is fatal.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;
use thiserror::Error;

use crate::network::{DEFAULT_HTTP_ADDR, DEFAULT_RPC_URL};
use crate::program::error::FeedError;
use crate::program::pda::{derive_feeds, parse_encoded_asset_id};
use crate::program::types::DerivedFeed;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid program id {input:?}: {reason}")]
    InvalidProgramId { input: String, reason: String },

    #[error("Invalid update frequency {input:?}: {reason}")]
    InvalidInterval { input: String, reason: String },

    #[error("Invalid HTTP address {input:?}: {reason}")]
    InvalidHttpAddr { input: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Invalid asset: {0}")]
    Feed(#[from] FeedError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// One tracked asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetConfig {
    /// Display name, also the table key
    pub name: String,
    /// Hex asset id, optional `0x` prefix
    pub encoded_asset_id: String,
}

/// Monitor configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Accepted for compatibility; not used by the sampler
    #[serde(default)]
    pub ws_url: Option<String>,
    /// Base58 Stork program id
    pub stork_contract_address: String,
    /// Duration string, e.g. "30s"
    pub update_frequency: String,
    /// Listen address for the HTTP surface
    #[serde(default)]
    pub http_addr: Option<String>,
    pub assets: Vec<AssetConfig>,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl Config {
    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            assets = config.assets.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate config JSON.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that later startup steps rely on.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Validation("rpcUrl must not be empty".to_string()));
        }
        if self.assets.is_empty() {
            return Err(ConfigError::Validation("assets must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset.name.trim().is_empty() {
                return Err(ConfigError::Validation("asset name must not be empty".to_string()));
            }
            if !seen.insert(asset.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate asset name {:?}",
                    asset.name
                )));
            }
            parse_encoded_asset_id(&asset.encoded_asset_id)?;
        }

        self.program_id()?;
        self.update_interval()?;
        self.http_addr()?;
        Ok(())
    }

    /// Stork program id.
    pub fn program_id(&self) -> Result<Pubkey> {
        parse_program_id(&self.stork_contract_address)
    }

    /// Sampling period.
    pub fn update_interval(&self) -> Result<Duration> {
        parse_duration(&self.update_frequency)
    }

    /// HTTP listen address, defaulting to [`DEFAULT_HTTP_ADDR`].
    pub fn http_addr(&self) -> Result<SocketAddr> {
        let input = self.http_addr.as_deref().unwrap_or(DEFAULT_HTTP_ADDR);
        input.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidHttpAddr {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }

    /// Asset names in config order
    pub fn asset_names(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.name.clone()).collect()
    }

    /// Derive the feed account of every configured asset.
    pub fn derive_feeds(&self) -> Result<Vec<DerivedFeed>> {
        let program_id = self.program_id()?;
        let feeds = derive_feeds(
            &program_id,
            self.assets
                .iter()
                .map(|a| (a.name.as_str(), a.encoded_asset_id.as_str())),
        )?;
        Ok(feeds)
    }
}

/// Parse a base58 program id.
pub fn parse_program_id(input: &str) -> Result<Pubkey> {
    let bytes = bs58::decode(input)
        .into_vec()
        .map_err(|e| ConfigError::InvalidProgramId {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| ConfigError::InvalidProgramId {
            input: input.to_string(),
            reason: format!("expected 32 bytes, got {}", b.len()),
        })?;

    Ok(Pubkey::new_from_array(bytes))
}

/// Parse a duration string such as "30s", "1m30s", "250ms" or "1.5h".
///
/// Accepted units: `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`. Every number needs
/// a unit. Zero and negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = |reason: &str| ConfigError::InvalidInterval {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }
    if s.starts_with('-') {
        return Err(invalid("duration must be positive"));
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);

    let mut total_ns: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_num) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("expected a number"));
        }

        let unit_len = after_num
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_num.len());
        let (unit, tail) = after_num.split_at(unit_len);
        let unit_ns: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid("number out of range"))?
        };
        let mut part_ns = whole
            .checked_mul(unit_ns)
            .ok_or_else(|| invalid("duration out of range"))?;

        // Digits past nanosecond resolution are dropped.
        let frac_digits = &frac_part[..frac_part.len().min(18)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse().map_err(|_| invalid("number out of range"))?;
            let scale = 10u128.pow(frac_digits.len() as u32);
            part_ns = part_ns
                .checked_add(frac * unit_ns / scale)
                .ok_or_else(|| invalid("duration out of range"))?;
        }

        total_ns = total_ns
            .checked_add(part_ns)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = tail;
    }

    if total_ns == 0 {
        return Err(invalid("duration must be positive"));
    }
    let secs = u64::try_from(total_ns / 1_000_000_000).map_err(|_| invalid("duration out of range"))?;
    Ok(Duration::new(secs, (total_ns % 1_000_000_000) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_ID: &str = "EfRvELrn4b5aJRwddD1VUrqzsfm1pewBLPebq3iMPDp2";

    fn sample_json() -> String {
        format!(
            r#"{{
                "rpcUrl": "https://api.devnet.solana.com",
                "wsUrl": "wss://api.devnet.solana.com",
                "storkContractAddress": "{}",
                "updateFrequency": "30s",
                "assets": [
                    {{ "name": "SOL/USD", "encodedAssetId": "0xabcd" }},
                    {{ "name": "BTC/USD", "encodedAssetId": "1234" }}
                ]
            }}"#,
            PROGRAM_ID
        )
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3_600));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("15ns").unwrap(), Duration::from_nanos(15));
    }

    #[test]
    fn test_parse_duration_compound_and_fractional() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h2m3s").unwrap(), Duration::from_secs(3_723));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("0.5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration(".25s").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("+5s").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_duration_rejects_invalid() {
        for input in [
            "", "   ", "30", "s", "10x", "1.s.", "-5s", "0s", "0", "1m-3s", "5 s",
            "94522879700260684295381835.9h",
        ] {
            assert!(
                matches!(parse_duration(input), Err(ConfigError::InvalidInterval { .. })),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_program_id() {
        let pubkey = parse_program_id(PROGRAM_ID).unwrap();
        assert_eq!(pubkey.to_string(), PROGRAM_ID);

        assert!(matches!(
            parse_program_id("not-base58!"),
            Err(ConfigError::InvalidProgramId { .. })
        ));
        assert!(matches!(
            parse_program_id("3mJr7AoUXx2Wqd"),
            Err(ConfigError::InvalidProgramId { .. })
        ));
    }

    #[test]
    fn test_load_valid_config() {
        let config = Config::from_json_str(&sample_json()).unwrap();

        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.ws_url.as_deref(), Some("wss://api.devnet.solana.com"));
        assert_eq!(config.update_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(config.http_addr().unwrap(), DEFAULT_HTTP_ADDR.parse().unwrap());
        assert_eq!(config.asset_names(), vec!["SOL/USD", "BTC/USD"]);
        assert_eq!(
            config.assets[0],
            AssetConfig {
                name: "SOL/USD".to_string(),
                encoded_asset_id: "0xabcd".to_string(),
            }
        );
    }

    #[test]
    fn test_derive_feeds_from_config() {
        let config = Config::from_json_str(&sample_json()).unwrap();
        let feeds = config.derive_feeds().unwrap();

        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].asset_name, "SOL/USD");
        assert_eq!(feeds[1].asset_id, vec![0x12, 0x34]);
    }

    #[test]
    fn test_bad_hex_rejected_at_load() {
        for bad in ["0xabc", "0xzz"] {
            let json = sample_json().replace("0xabcd", bad);
            assert!(
                matches!(
                    Config::from_json_str(&json),
                    Err(ConfigError::Feed(FeedError::InvalidIdentifier { .. }))
                ),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_fraction_overflow_is_rejected() {
        assert!(matches!(
            parse_duration("94522879700260684295381835.9h"),
            Err(ConfigError::InvalidInterval { reason, .. }) if reason == "duration out of range"
        ));
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let bad_interval = sample_json().replace("30s", "soon");
        assert!(matches!(
            Config::from_json_str(&bad_interval),
            Err(ConfigError::InvalidInterval { .. })
        ));

        let bad_program = sample_json().replace(PROGRAM_ID, "xyz");
        assert!(matches!(
            Config::from_json_str(&bad_program),
            Err(ConfigError::InvalidProgramId { .. })
        ));

        let duplicate = sample_json().replace("BTC/USD", "SOL/USD");
        assert!(matches!(
            Config::from_json_str(&duplicate),
            Err(ConfigError::Validation(_))
        ));

        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rpc_url_defaults() {
        let json = format!(
            r#"{{"storkContractAddress": "{}", "updateFrequency": "1s",
                "assets": [{{"name": "SOL/USD", "encodedAssetId": "abcd"}}]}}"#,
            PROGRAM_ID
        );
        let config = Config::from_json_str(&json).unwrap();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert!(config.ws_url.is_none());
    }

    #[test]
    fn test_empty_assets_rejected() {
        let json = format!(
            r#"{{"rpcUrl": "http://localhost:8899", "storkContractAddress": "{}",
                "updateFrequency": "1s", "assets": []}}"#,
            PROGRAM_ID
        );
        assert!(matches!(
            Config::from_json_str(&json),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_custom_http_addr() {
        let json = sample_json().replace(
            r#""updateFrequency""#,
            r#""httpAddr": "127.0.0.1:9090", "updateFrequency""#,
        );
        let config = Config::from_json_str(&json).unwrap();
        assert_eq!(config.http_addr().unwrap(), "127.0.0.1:9090".parse().unwrap());

        let bad = sample_json().replace(
            r#""updateFrequency""#,
            r#""httpAddr": "localhost", "updateFrequency""#,
        );
        assert!(matches!(
            Config::from_json_str(&bad),
            Err(ConfigError::InvalidHttpAddr { .. })
        ));
    }
}
