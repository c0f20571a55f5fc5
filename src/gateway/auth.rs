//! Shared-secret authentication.

use axum::http::{HeaderMap, header};
use tracing::warn;

use super::error::GatewayError;
use crate::config::Config;

/// Exact-match check of the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    scheme: String,
    expected: Option<String>,
}

impl AuthPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scheme: config.auth_scheme.clone(),
            expected: config.expected_auth_header(),
        }
    }

    /// Accept the request when no token is configured or when the first
    /// `Authorization` header equals `<scheme> <token>` byte for byte.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        let Some(expected) = &self.expected else {
            return Ok(());
        };

        let provided = headers
            .get(header::AUTHORIZATION)
            .map(|value| value.as_bytes());

        if provided == Some(expected.as_bytes()) {
            return Ok(());
        }

        warn!("Rejected unauthorized request");
        Err(GatewayError::Unauthorized {
            scheme: self.scheme.clone(),
        })
    }
}
