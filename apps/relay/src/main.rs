//! Moxo completion relay service.
//!
//! Accepts completion requests over HTTP, forwards them to the Moxo webhook
//! with optional Basic Authentication, and translates the webhook's answer
//! for the caller.

use anyhow::Result;
use moxo_relay::config::RelayConfig;
use moxo_relay::http::{AppState, router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RelayConfig::from_env()?;
    info!(
        endpoint = %config.endpoint,
        basic_auth = config.credentials.is_some(),
        "relaying completions to moxo"
    );

    let app = router(AppState::new(&config));
    let listener = TcpListener::bind(config.bind).await?;
    info!("moxo-relay listening on {}", config.bind);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
