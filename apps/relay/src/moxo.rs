//! Outbound client for the Moxo completion webhook.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use crate::config::{BasicAuth, RelayConfig};

/// The exact body forwarded upstream; no other inbound field leaks through.
#[derive(Debug, Clone, Serialize)]
pub struct CompletePayload {
    pub conversation_id: String,
    pub transobject_id: String,
}

/// What the webhook answered: status plus the body read as plain text.
#[derive(Debug)]
pub struct MoxoReply {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct MoxoClient {
    http: reqwest::Client,
    endpoint: String,
    auth_header: Option<String>,
}

impl MoxoClient {
    pub fn new(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            auth_header: config.credentials.as_ref().map(basic_auth_header),
        }
    }

    /// Single completion attempt, no retries. The reply body is captured
    /// whatever the status; callers decide what a non-2xx means.
    pub async fn complete(&self, payload: &CompletePayload) -> Result<MoxoReply, reqwest::Error> {
        let mut request = self.http.post(&self.endpoint).json(payload);
        if let Some(value) = &self.auth_header {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(MoxoReply { status, body })
    }
}

/// `Basic` scheme value for the `Authorization` header.
fn basic_auth_header(creds: &BasicAuth) -> String {
    let token = STANDARD.encode(format!("{}:{}", creds.username, creds.password));
    format!("Basic {token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_auth_header_encodes_the_pair() {
        let header = basic_auth_header(&BasicAuth {
            username: "user".into(),
            password: "pass".into(),
        });
        assert_eq!(header, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn payload_serializes_only_the_two_ids() {
        let payload = CompletePayload {
            conversation_id: "conv-1".into(),
            transobject_id: "obj-2".into(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "conversation_id": "conv-1", "transobject_id": "obj-2" })
        );
    }
}
