use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure modes of a single relay attempt.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Missing conversation_id or transobject_id")]
    MissingIds,
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("moxo webhook answered {status}")]
    Rejected { status: StatusCode, body: String },
    #[error("moxo webhook unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingIds => StatusCode::BAD_REQUEST,
            RelayError::InvalidBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            RelayError::Rejected { .. } => "Moxo rejected request".to_string(),
            RelayError::InvalidBody(_) | RelayError::Upstream(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            RelayError::MethodNotAllowed | RelayError::MissingIds => None,
            RelayError::InvalidBody(err) => Some(err.to_string()),
            RelayError::Rejected { body, .. } => Some(body.clone()),
            RelayError::Upstream(err) => Some(err.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.message(),
            detail: self.detail(),
        });
        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}
