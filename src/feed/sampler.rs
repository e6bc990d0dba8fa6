//! Periodic feed sampler.
//!
//! Each tick fetches every derived feed account concurrently, decodes it and
//! writes the result into the [`FeedTable`]. A failure for one asset is
//! logged and skipped; it never affects the other assets or the loop.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::time::{interval, MissedTickBehavior};

use crate::feed::table::{FeedTable, PriceFeedEntry};
use crate::program::accounts::TemporalNumericValueFeed;
use crate::program::client::AccountSource;
use crate::program::types::DerivedFeed;

/// Why an asset was skipped for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The account source returned an error
    Fetch,
    /// The account does not exist or holds no data
    EmptyAccount,
    /// The account data could not be decoded
    Decode,
    /// The table has no entry for the asset
    UnknownAsset,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Fetch => write!(f, "fetch"),
            SkipReason::EmptyAccount => write!(f, "empty account"),
            SkipReason::Decode => write!(f, "decode"),
            SkipReason::UnknownAsset => write!(f, "unknown asset"),
        }
    }
}

/// Result of sampling one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    Updated,
    Skipped(SkipReason),
}

/// Per-tick summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Assets written to the table
    pub updated: Vec<String>,
    /// Assets left unchanged, with the reason
    pub skipped: Vec<(String, SkipReason)>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Drives the fetch → decode → update cycle on a fixed interval.
pub struct Sampler {
    feeds: Vec<DerivedFeed>,
    source: Arc<dyn AccountSource>,
    table: FeedTable,
    period: Duration,
}

impl Sampler {
    /// Create a sampler.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(
        feeds: Vec<DerivedFeed>,
        source: Arc<dyn AccountSource>,
        table: FeedTable,
        period: Duration,
    ) -> Self {
        assert!(!period.is_zero(), "sampling period must be non-zero");
        Self {
            feeds,
            source,
            table,
            period,
        }
    }

    /// Table this sampler writes to
    pub fn table(&self) -> &FeedTable {
        &self.table
    }

    pub fn feeds(&self) -> &[DerivedFeed] {
        &self.feeds
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one tick over every feed.
    pub async fn run_tick(&self) -> TickReport {
        let outcomes = join_all(self.feeds.iter().map(|feed| self.sample(feed))).await;

        let mut report = TickReport::default();
        for (feed, outcome) in self.feeds.iter().zip(outcomes) {
            match outcome {
                SampleOutcome::Updated => report.updated.push(feed.asset_name.clone()),
                SampleOutcome::Skipped(reason) => {
                    report.skipped.push((feed.asset_name.clone(), reason))
                }
            }
        }

        tracing::debug!(
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "Tick complete"
        );
        report
    }

    /// Sample a single feed. Every failure is contained here.
    async fn sample(&self, feed: &DerivedFeed) -> SampleOutcome {
        let data = match self.source.fetch_account(&feed.address).await {
            Ok(Some(data)) if !data.is_empty() => data,
            Ok(_) => {
                tracing::debug!(asset = %feed.asset_name, "No value found");
                return SampleOutcome::Skipped(SkipReason::EmptyAccount);
            }
            Err(e) => {
                tracing::error!(
                    asset = %feed.asset_name,
                    account = %feed.address,
                    error = %e,
                    "Failed to get account info"
                );
                return SampleOutcome::Skipped(SkipReason::Fetch);
            }
        };

        let decoded = match TemporalNumericValueFeed::deserialize(&data) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!(
                    asset = %feed.asset_name,
                    account = %feed.address,
                    error = %e,
                    "Failed to decode account data"
                );
                return SampleOutcome::Skipped(SkipReason::Decode);
            }
        };

        if self.table.update(&feed.asset_name, &decoded, Utc::now()).await {
            SampleOutcome::Updated
        } else {
            SampleOutcome::Skipped(SkipReason::UnknownAsset)
        }
    }

    /// Tick immediately, then once per period, forever.
    ///
    /// `on_tick` runs after every tick with a snapshot taken right after the
    /// tick and the tick report.
    pub async fn run<F>(self, mut on_tick: F)
    where
        F: FnMut(&BTreeMap<String, PriceFeedEntry>, &TickReport),
    {
        tracing::info!(
            feeds = self.feeds.len(),
            period_ms = self.period.as_millis() as u64,
            "Starting price feed monitor"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.run_tick().await;
            let snapshot = self.table.snapshot().await;
            on_tick(&snapshot, &report);
        }
    }
}
