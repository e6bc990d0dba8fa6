//! Latest-value cache and the sampler that keeps it fresh.

pub mod sampler;
pub mod table;

pub use sampler::{SampleOutcome, Sampler, SkipReason, TickReport};
pub use table::{FeedTable, PriceFeedEntry};
