//! HTTP surface of the relay.
//!
//! ```text
//! POST `{ "conversation_id": "c-1", "transobject_id": "t-1" }`
//! to `/api/complete` to complete the transobject via the Moxo webhook.
//! ```

use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::cors::with_cors_headers;
use crate::error::RelayError;
use crate::moxo::{CompletePayload, MoxoClient};
use crate::reqid::with_request_id;

#[derive(Clone)]
pub struct AppState {
    pub moxo: MoxoClient,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            moxo: MoxoClient::new(reqwest::Client::new(), config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/complete",
            post(complete)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(with_request_id))
        .layer(middleware::from_fn(with_cors_headers))
        .with_state(state)
}

/// Raw decode of the caller's body; the ids are checked separately so a
/// missing field answers 400 rather than a decode error.
#[derive(Debug, Deserialize)]
struct CompleteRequest {
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    transobject_id: Option<String>,
}

impl CompleteRequest {
    fn into_payload(self) -> Option<CompletePayload> {
        let conversation_id = self.conversation_id.filter(|id| !id.is_empty())?;
        let transobject_id = self.transobject_id.filter(|id| !id.is_empty())?;
        Some(CompletePayload {
            conversation_id,
            transobject_id,
        })
    }
}

/// Body returned to the caller once the webhook accepts the completion.
#[derive(Debug, Serialize)]
pub struct RelayAck {
    pub success: bool,
    pub detail: String,
}

async fn complete(
    request_id: Option<Extension<String>>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayAck>, RelayError> {
    let rid = request_id.as_ref().map(|Extension(id)| id.as_str());

    let request: CompleteRequest = serde_json::from_slice(&body).map_err(|err| {
        error!(request_id = ?rid, error = %err, "failed to decode completion request");
        RelayError::InvalidBody(err)
    })?;

    let payload = request.into_payload().ok_or_else(|| {
        warn!(request_id = ?rid, "completion request missing conversation_id or transobject_id");
        RelayError::MissingIds
    })?;

    let reply = state.moxo.complete(&payload).await.map_err(|err| {
        error!(request_id = ?rid, error = %err, "moxo webhook request failed");
        RelayError::Upstream(err)
    })?;

    if !reply.status.is_success() {
        error!(
            request_id = ?rid,
            status = %reply.status,
            body = %reply.body,
            "moxo webhook rejected completion"
        );
        return Err(RelayError::Rejected {
            status: reply.status,
            body: reply.body,
        });
    }

    info!(
        request_id = ?rid,
        conversation_id = %payload.conversation_id,
        transobject_id = %payload.transobject_id,
        "completion relayed"
    );

    let detail = if reply.body.is_empty() {
        "completed".to_string()
    } else {
        reply.body
    };
    Ok(Json(RelayAck {
        success: true,
        detail,
    }))
}

// Preflight answers 200 with an empty body; the headers themselves come from
// the middleware.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed(method: Method) -> RelayError {
    warn!(%method, "method not allowed on /api/complete");
    RelayError::MethodNotAllowed
}

async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}
