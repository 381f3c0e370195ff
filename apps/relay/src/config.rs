use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::warn;

/// Upstream used when `MOXO_ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "https://pavan-demo.moxo.com/v1/completeTransobject";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Everything the relay needs, resolved once at startup and handed to the
/// handler state; nothing in the request path reads the environment.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub endpoint: String,
    pub credentials: Option<BasicAuth>,
}

/// Username/password pair for the upstream `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var("BIND").ok(),
            std::env::var("MOXO_ENDPOINT").ok(),
            std::env::var("BASIC_AUTH_USER").ok(),
            std::env::var("BASIC_AUTH_PASS").ok(),
        )
    }

    /// Resolves a config from raw environment values; tests feed inputs
    /// directly instead of mutating the process environment.
    pub fn resolve(
        bind: Option<String>,
        endpoint: Option<String>,
        user: Option<String>,
        pass: Option<String>,
    ) -> Result<Self> {
        let bind = bind
            .unwrap_or_else(|| DEFAULT_BIND.into())
            .parse()
            .context("invalid BIND address")?;
        let endpoint = endpoint
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.into());

        Ok(Self {
            bind,
            endpoint,
            credentials: basic_auth(user, pass),
        })
    }
}

/// Only a fully set pair yields credentials; a half-set pair warns once and
/// the relay sends no `Authorization` header.
fn basic_auth(user: Option<String>, pass: Option<String>) -> Option<BasicAuth> {
    let user = user.filter(|value| !value.is_empty());
    let pass = pass.filter(|value| !value.is_empty());
    match (user, pass) {
        (Some(username), Some(password)) => Some(BasicAuth { username, password }),
        (None, None) => None,
        _ => {
            warn!(
                "BASIC_AUTH_USER and BASIC_AUTH_PASS must both be set; relaying without Authorization"
            );
            None
        }
    }
}
