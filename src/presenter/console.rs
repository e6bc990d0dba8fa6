//! Console rendering of the feed table.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::feed::table::PriceFeedEntry;
use crate::program::constants::{PRICE_DECIMALS, PRICE_SCALE};

const HEADER: &str = "----- Stork Price Feed -----";
const SEPARATOR: &str = "----------------------------------------";
const NO_DATA: &str = "No data available";

/// Render a quantized price as a fixed-point decimal with 8 places.
///
/// Exact for every i128; no floating point involved.
pub fn format_price(quantized: i128) -> String {
    let abs = quantized.unsigned_abs();
    let sign = if quantized < 0 { "-" } else { "" };
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / PRICE_SCALE,
        abs % PRICE_SCALE,
        width = PRICE_DECIMALS as usize
    )
}

/// Render a nanosecond Unix timestamp as RFC 3339 UTC with nanoseconds.
pub fn format_timestamp_ns(timestamp_ns: u64) -> String {
    let secs = (timestamp_ns / 1_000_000_000) as i64;
    let nanos = (timestamp_ns % 1_000_000_000) as u32;
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Nanos, true),
        None => timestamp_ns.to_string(),
    }
}

/// One console line for an entry.
pub fn render_feed_line(entry: &PriceFeedEntry) -> String {
    match entry.price {
        Some(price) => format!(
            "{:<9}: ${:<12} (timestamp: {})",
            entry.name,
            format_price(price),
            format_timestamp_ns(entry.timestamp_ns)
        ),
        None => format!("{:<9}: {}", entry.name, NO_DATA),
    }
}

/// Full console block for a snapshot.
pub fn render_snapshot(
    snapshot: &BTreeMap<String, PriceFeedEntry>,
    rendered_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", HEADER);
    let _ = writeln!(
        out,
        "Updated at: {}",
        rendered_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "{}", SEPARATOR);
    for entry in snapshot.values() {
        let _ = writeln!(out, "{}", render_feed_line(entry));
    }
    let _ = writeln!(out, "{}", SEPARATOR);
    out
}
