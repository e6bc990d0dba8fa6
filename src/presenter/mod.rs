//! Read-only views of the feed table.
//!
//! Neither view mutates the table; both render from a snapshot.

pub mod console;
pub mod http;

pub use console::{format_price, format_timestamp_ns, render_feed_line, render_snapshot};
pub use http::{build_router, render_page, serve};
