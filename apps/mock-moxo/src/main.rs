//! Stand-in for the Moxo webhook during local development.
//!
//! ```text
//! MOCK_MOXO_STATUS=500 MOCK_MOXO_BODY=boom cargo run -p mock-moxo
//! ```

use anyhow::Result;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new().route("/v1/completeTransobject", post(handle));
    let addr = std::env::var("BIND").unwrap_or_else(|_| "0.0.0.0:9080".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("mock-moxo listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle(headers: HeaderMap, Json(payload): Json<Value>) -> (StatusCode, String) {
    tracing::info!(
        authorized = headers.contains_key(header::AUTHORIZATION),
        "MOXO WEBHOOK: {}",
        payload
    );

    let status = std::env::var("MOCK_MOXO_STATUS")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);
    let body = std::env::var("MOCK_MOXO_BODY").unwrap_or_else(|_| "ok".into());
    (status, body)
}
