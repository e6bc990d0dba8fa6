//! Constants for the Stork feed program.
//!
//! Seeds and account sizes matching the on-chain program exactly.

// ============================================================================
// PDA Seeds
// ============================================================================

/// Feed account PDA seed
pub const STORK_FEED_SEED: &[u8] = b"stork_feed";

// ============================================================================
// Account Sizes
// ============================================================================

/// Feed id size in bytes
pub const FEED_ID_SIZE: usize = 32;

/// Nanosecond timestamp size in bytes
pub const TIMESTAMP_SIZE: usize = 8;

/// Quantized value size in bytes (i128)
pub const QUANTIZED_VALUE_SIZE: usize = 16;

/// TemporalNumericValueFeed account size: id + timestamp + quantized value
pub const FEED_ACCOUNT_SIZE: usize = FEED_ID_SIZE + TIMESTAMP_SIZE + QUANTIZED_VALUE_SIZE;

// ============================================================================
// Pricing
// ============================================================================

/// Decimal places carried by every quantized value.
pub const PRICE_DECIMALS: u32 = 8;

/// Scale applied to quantized values (10^8).
pub const PRICE_SCALE: u128 = 100_000_000;
