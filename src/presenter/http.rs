//! Read-only HTTP surface: JSON API and a server-rendered page.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::feed::table::{FeedTable, PriceFeedEntry};
use crate::presenter::console::{format_price, format_timestamp_ns};

/// Build the router over a shared table.
///
/// Routes:
/// - `GET /api/prices` latest entries as JSON
/// - `GET /` HTML page
/// - `GET /healthz` liveness
pub fn build_router(table: FeedTable) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/prices", get(prices_handler))
        .route("/healthz", get(health_handler))
        .with_state(table)
}

/// Bind and serve until the process stops.
pub async fn serve(addr: SocketAddr, table: FeedTable) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("http: listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(table)).await
}

async fn prices_handler(State(table): State<FeedTable>) -> impl IntoResponse {
    (StatusCode::OK, Json(table.snapshot().await))
}

async fn index_handler(State(table): State<FeedTable>) -> impl IntoResponse {
    let snapshot = table.snapshot().await;
    Html(render_page(&snapshot, Utc::now()))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Render the price page for a snapshot.
pub fn render_page(snapshot: &BTreeMap<String, PriceFeedEntry>, rendered_at: DateTime<Utc>) -> String {
    let mut rows = String::new();
    for entry in snapshot.values() {
        let (price, source_time) = match entry.price {
            Some(price) => (
                format!("${}", format_price(price)),
                format_timestamp_ns(entry.timestamp_ns),
            ),
            None => ("No data available".to_string(), "-".to_string()),
        };
        let last_update = entry
            .last_update
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            rows,
            "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.name),
            price,
            source_time,
            last_update
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta http-equiv="refresh" content="10">
  <title>Stork Price Feed</title>
</head>
<body>
  <h1>Stork Price Feed</h1>
  <p>Last updated: {}</p>
  <table>
    <thead>
      <tr><th>Asset</th><th>Price</th><th>Source time</th><th>Refreshed</th></tr>
    </thead>
    <tbody>
{}    </tbody>
  </table>
</body>
</html>
"#,
        rendered_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        rows
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
