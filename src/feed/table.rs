//! Shared latest-value table.
//!
//! One entry per configured asset. The key set is fixed at construction;
//! the sampler replaces entries wholesale under the write lock, readers copy
//! them out under the read lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tokio::sync::RwLock;

use crate::program::accounts::TemporalNumericValueFeed;

/// Latest observed value for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceFeedEntry {
    /// Asset name
    pub name: String,
    /// Quantized price (scaled by 10^8), None until the first decode
    #[serde(serialize_with = "serialize_price")]
    pub price: Option<i128>,
    /// Source timestamp in nanoseconds
    #[serde(rename = "Timestamp")]
    pub timestamp_ns: u64,
    /// Wall-clock time of the last successful refresh
    pub last_update: Option<DateTime<Utc>>,
}

impl PriceFeedEntry {
    /// Create an entry with no data yet
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
            timestamp_ns: 0,
            last_update: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.price.is_some()
    }

    fn apply(&mut self, decoded: &TemporalNumericValueFeed, now: DateTime<Utc>) {
        self.price = Some(decoded.quantized_value());
        self.timestamp_ns = decoded.timestamp_ns();
        // last_update never moves backwards
        self.last_update = Some(match self.last_update {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

/// Prices are serialized as decimal strings; i128 does not fit a JSON number.
fn serialize_price<S: Serializer>(price: &Option<i128>, serializer: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}

/// Concurrently readable asset → latest value table.
///
/// Cloning is cheap and shares the same table.
#[derive(Debug, Clone)]
pub struct FeedTable {
    entries: Arc<RwLock<BTreeMap<String, PriceFeedEntry>>>,
}

impl FeedTable {
    /// Create a table with one empty entry per asset name
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                (name.clone(), PriceFeedEntry::empty(name))
            })
            .collect();

        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Get a copy of one entry (None for unconfigured names)
    pub async fn get(&self, name: &str) -> Option<PriceFeedEntry> {
        self.entries.read().await.get(name).cloned()
    }

    /// Replace the value of one entry.
    ///
    /// Returns false, without touching the table, for an unconfigured name.
    pub async fn update(
        &self,
        name: &str,
        decoded: &TemporalNumericValueFeed,
        now: DateTime<Utc>,
    ) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(name) {
            Some(entry) => {
                entry.apply(decoded, now);
                true
            }
            None => {
                tracing::warn!(asset = name, "Update for unconfigured asset ignored");
                false
            }
        }
    }

    /// Copy of every entry, ordered by asset name
    pub async fn snapshot(&self) -> BTreeMap<String, PriceFeedEntry> {
        self.entries.read().await.clone()
    }

    /// Configured asset names, ordered
    pub async fn names(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::accounts::TemporalNumericValue;
    use chrono::{Duration, TimeZone};

    fn decoded(timestamp_ns: u64, quantized_value: i128) -> TemporalNumericValueFeed {
        TemporalNumericValueFeed {
            id: [0u8; 32],
            latest_value: TemporalNumericValue {
                timestamp_ns,
                quantized_value,
            },
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_new_table_has_empty_entries() {
        let table = FeedTable::new(["SOL/USD", "BTC/USD"]);

        assert_eq!(table.len().await, 2);
        assert_eq!(table.names().await, vec!["BTC/USD", "SOL/USD"]);

        let entry = table.get("SOL/USD").await.unwrap();
        assert_eq!(entry, PriceFeedEntry::empty("SOL/USD"));
        assert!(!entry.has_data());
    }

    #[tokio::test]
    async fn test_get_unconfigured_is_none() {
        let table = FeedTable::new(["SOL/USD"]);
        assert!(table.get("ETH/USD").await.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_entry() {
        let table = FeedTable::new(["SOL/USD"]);

        assert!(table.update("SOL/USD", &decoded(1_000, 250_000_000_000), t0()).await);

        let entry = table.get("SOL/USD").await.unwrap();
        assert_eq!(entry.price, Some(250_000_000_000));
        assert_eq!(entry.timestamp_ns, 1_000);
        assert_eq!(entry.last_update, Some(t0()));
    }

    #[tokio::test]
    async fn test_update_unconfigured_is_noop() {
        let table = FeedTable::new(["SOL/USD"]);
        let before = table.snapshot().await;

        assert!(!table.update("ETH/USD", &decoded(1, 2), t0()).await);
        assert_eq!(table.snapshot().await, before);
        assert!(table.get("ETH/USD").await.is_none());
    }

    #[tokio::test]
    async fn test_last_update_is_monotonic() {
        let table = FeedTable::new(["SOL/USD"]);
        let later = t0() + Duration::seconds(30);

        table.update("SOL/USD", &decoded(2, 20), later).await;
        table.update("SOL/USD", &decoded(3, 30), t0()).await;

        let entry = table.get("SOL/USD").await.unwrap();
        assert_eq!(entry.price, Some(30));
        assert_eq!(entry.last_update, Some(later));
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let table = FeedTable::new(["SOL/USD"]);
        let snapshot = table.snapshot().await;

        table.update("SOL/USD", &decoded(1, 1), t0()).await;

        assert!(snapshot["SOL/USD"].price.is_none());
        assert_eq!(table.snapshot().await["SOL/USD"].price, Some(1));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let table = FeedTable::new(["SOL/USD"]);
        let reader = table.clone();

        table.update("SOL/USD", &decoded(5, 6), t0()).await;
        assert_eq!(reader.get("SOL/USD").await.unwrap().price, Some(6));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_never_see_torn_entries() {
        let table = FeedTable::new(["SOL/USD"]);

        let writer = {
            let table = table.clone();
            tokio::spawn(async move {
                for i in 1..=500u64 {
                    table
                        .update("SOL/USD", &decoded(i, i as i128 * 10), t0())
                        .await;
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let entry = table.snapshot().await.remove("SOL/USD").unwrap();
                        match entry.price {
                            Some(price) => assert_eq!(price, entry.timestamp_ns as i128 * 10),
                            None => assert_eq!(entry.timestamp_ns, 0),
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }

    #[test]
    fn test_entry_json_shape() {
        let mut entry = PriceFeedEntry::empty("SOL/USD");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Name": "SOL/USD",
                "Price": null,
                "Timestamp": 0,
                "LastUpdate": null,
            })
        );

        entry.apply(&decoded(1_000, -250_000_000_000), t0());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["Price"], "-250000000000");
        assert_eq!(json["Timestamp"], 1_000);
        assert_eq!(json["LastUpdate"], "2024-05-01T12:00:00Z");
    }
}
