//! Relay forwarder
//!
//! Reissues a client's completion request to the configured upstream with the
//! headers and credentials the upstream expects, and hands back the upstream
//! body untouched. The forwarder holds no mutable state, so one instance is
//! shared by every worker.

pub mod server;


use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::core::config::RelayConfig;
use crate::utils::url::parse_http_url;

/// `error` field of the JSON body returned when forwarding fails.
pub const RELAY_FAILURE: &str = "relay request failed";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid upstream header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("environment variable {var} is not set")]
    MissingToken { var: String },
    #[error("invalid upstream url: {0}")]
    InvalidUpstream(String),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": RELAY_FAILURE,
            "message": self.to_string(),
        }))
    }
}

/// A successful upstream answer, passed through as received.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProxyResponse {
    pub fn into_http_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let mut builder = HttpResponse::build(status);
        if let Some(content_type) = self.content_type {
            builder.content_type(content_type);
        }
        builder.body(self.body)
    }
}

#[derive(Debug, Clone)]
pub struct RelayForwarder {
    client: reqwest::Client,
    upstream_url: reqwest::Url,
    headers: HeaderMap,
}

impl RelayForwarder {
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let upstream_url = parse_http_url(&config.upstream_url)
            .ok_or_else(|| RelayError::InvalidUpstream(config.upstream_url.clone()))?;
        let headers = build_upstream_headers(config)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            upstream_url,
            headers,
        })
    }

    pub fn upstream_url(&self) -> &str {
        self.upstream_url.as_str()
    }

    /// POST `body` upstream once. Non-2xx answers become
    /// [`RelayError::UpstreamStatus`]; nothing is retried.
    pub async fn forward(&self, body: &Value) -> Result<ProxyResponse, RelayError> {
        let response = self
            .client
            .post(self.upstream_url.clone())
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "forwarding to upstream failed");
                RelayError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "upstream rejected forwarded request");
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(|err| {
            error!(error = %err, "reading upstream body failed");
            RelayError::Transport(err)
        })?;

        Ok(ProxyResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn build_upstream_headers(config: &RelayConfig) -> Result<HeaderMap, RelayError> {
    let invalid = |name: &str, reason: String| RelayError::InvalidHeader {
        name: name.to_string(),
        reason,
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|err| invalid(name.as_str(), err.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|err| invalid(name.as_str(), err.to_string()))?;
        headers.insert(header_name, header_value);
    }

    if let Some(var) = &config.bearer_token_env {
        let token = std::env::var(var)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| RelayError::MissingToken { var: var.clone() })?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|err| invalid(AUTHORIZATION.as_str(), err.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
