//! Account structures and deserialization for Stork feed accounts.
//!
//! Byte layouts match the on-chain program exactly.

use crate::program::constants::{
    FEED_ACCOUNT_SIZE, FEED_ID_SIZE, QUANTIZED_VALUE_SIZE, TIMESTAMP_SIZE,
};
use crate::program::error::{FeedError, FeedResult};

/// Helper to extract a fixed-size array from a slice
#[inline]
fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> FeedResult<[u8; N]> {
    let end = offset
        .checked_add(N)
        .ok_or_else(|| FeedError::MalformedData(format!("offset {} overflows", offset)))?;
    let slice = data.get(offset..end).ok_or_else(|| {
        FeedError::MalformedData(format!(
            "field [{}..{}] out of bounds for {} bytes",
            offset,
            end,
            data.len()
        ))
    })?;

    let mut arr = [0u8; N];
    arr.copy_from_slice(slice);
    Ok(arr)
}

/// Helper to read a u64 from data (little-endian)
#[inline]
fn read_u64(data: &[u8], offset: usize) -> FeedResult<u64> {
    read_bytes::<8>(data, offset).map(u64::from_le_bytes)
}

/// Helper to read an i128 from data (little-endian, two's complement)
#[inline]
fn read_i128(data: &[u8], offset: usize) -> FeedResult<i128> {
    read_bytes::<16>(data, offset).map(i128::from_le_bytes)
}

// ============================================================================
// TemporalNumericValue (24 bytes)
// ============================================================================

/// A quantized value stamped with its source time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalNumericValue {
    /// Source timestamp in nanoseconds since the Unix epoch
    pub timestamp_ns: u64,
    /// Price scaled by 10^8
    pub quantized_value: i128,
}

// ============================================================================
// TemporalNumericValueFeed Account (56 bytes)
// ============================================================================

/// Feed account holding the latest value for one asset.
///
/// Layout:
/// - [0..32]  id (32 bytes)
/// - [32..40] latest_value.timestamp_ns (8 bytes LE)
/// - [40..56] latest_value.quantized_value (16 bytes LE, signed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalNumericValueFeed {
    /// Feed id
    pub id: [u8; 32],
    /// Most recent value written by the oracle
    pub latest_value: TemporalNumericValue,
}

impl TemporalNumericValueFeed {
    /// Account size in bytes
    pub const LEN: usize = FEED_ACCOUNT_SIZE;

    const TIMESTAMP_OFFSET: usize = FEED_ID_SIZE;
    const VALUE_OFFSET: usize = FEED_ID_SIZE + TIMESTAMP_SIZE;

    /// Deserialize from account data.
    ///
    /// Bytes past [`Self::LEN`] are ignored.
    pub fn deserialize(data: &[u8]) -> FeedResult<Self> {
        if data.len() < Self::LEN {
            return Err(FeedError::TruncatedData {
                expected: Self::LEN,
                actual: data.len(),
            });
        }

        let id = read_bytes::<FEED_ID_SIZE>(data, 0)?;
        let timestamp_ns = read_u64(data, Self::TIMESTAMP_OFFSET)?;
        let quantized_value = read_i128(data, Self::VALUE_OFFSET)?;

        Ok(Self {
            id,
            latest_value: TemporalNumericValue {
                timestamp_ns,
                quantized_value,
            },
        })
    }

    /// Serialize to the on-chain layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&self.id);
        data.extend_from_slice(&self.latest_value.timestamp_ns.to_le_bytes());
        data.extend_from_slice(&self.latest_value.quantized_value.to_le_bytes());
        debug_assert_eq!(data.len(), FEED_ID_SIZE + TIMESTAMP_SIZE + QUANTIZED_VALUE_SIZE);
        data
    }

    /// Timestamp of the latest value.
    pub fn timestamp_ns(&self) -> u64 {
        self.latest_value.timestamp_ns
    }

    /// Quantized value of the latest value.
    pub fn quantized_value(&self) -> i128 {
        self.latest_value.quantized_value
    }
}
