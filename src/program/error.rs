//! Error types for feed address derivation, account fetching and decoding.

use thiserror::Error;

/// Feed-level errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Encoded asset id is not valid hex
    #[error("Invalid encoded asset id {input:?}: {reason}")]
    InvalidIdentifier { input: String, reason: String },

    /// No program address could be derived for the given seeds
    #[error("Failed to derive feed address for asset id {asset_id}")]
    Derivation { asset_id: String },

    /// Account data shorter than the fixed layout
    #[error("Truncated account data: expected at least {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    /// Account data inconsistent with the fixed layout
    #[error("Malformed account data: {0}")]
    MalformedData(String),

    /// RPC client error
    #[cfg(feature = "rpc")]
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    /// Transport failure reported by a non-RPC account source
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
