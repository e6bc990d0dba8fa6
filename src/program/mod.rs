//! On-chain program interaction module for Stork feeds.
//!
//! Feed account derivation, decoding and fetching.

pub mod accounts;
pub mod client;
pub mod constants;
pub mod error;
pub mod pda;
pub mod types;

// Re-export commonly used items
pub use accounts::{TemporalNumericValue, TemporalNumericValueFeed};
#[cfg(feature = "rpc")]
pub use client::StorkRpcClient;
pub use client::{AccountSource, InMemoryAccountSource};
pub use constants::*;
pub use error::{FeedError, FeedResult};
pub use pda::*;
pub use types::*;
