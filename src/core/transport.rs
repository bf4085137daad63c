//! Completion transports
//!
//! The pipeline only needs "send this request, give me the reply text". The
//! HTTP transport covers both routes: through the relay's `/api/chat`, or
//! straight to an OpenAI-compatible provider with an API key.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::api::reply::extract_reply_text;
use crate::api::ChatRequest;
use crate::core::config::{AuthMode, ChatConfig, Route};
use crate::utils::auth::add_auth_headers;
use crate::utils::url::{construct_api_url, parse_http_url};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("upstream body carried no reply text")]
    MalformedBody,
    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
    #[error("environment variable {var} is not set")]
    MissingApiKey { var: String },
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Send one completion request and return the reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
struct Credential {
    mode: AuthMode,
    api_key: String,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    credential: Option<Credential>,
}

impl HttpTransport {
    fn build(
        endpoint: String,
        credential: Option<Credential>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let endpoint =
            parse_http_url(&endpoint).ok_or(TransportError::InvalidEndpoint(endpoint))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credential,
        })
    }

    /// Post to the relay endpoint as-is; the relay owns the credentials.
    pub fn via_relay(relay_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        Self::build(relay_url.trim().to_string(), None, timeout)
    }

    /// Post to `{base_url}/chat/completions` with the given key.
    pub fn direct(
        base_url: &str,
        mode: AuthMode,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Self::build(
            construct_api_url(base_url, "chat/completions"),
            Some(Credential {
                mode,
                api_key: api_key.into(),
            }),
            timeout,
        )
    }

    /// Pick the route named in `[chat]`. The direct route reads its key from
    /// the configured environment variable.
    pub fn from_config(config: &ChatConfig) -> Result<Self, TransportError> {
        match config.route {
            Route::Relay => Self::via_relay(&config.relay_url, config.timeout()),
            Route::Direct => {
                let api_key = std::env::var(&config.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| TransportError::MissingApiKey {
                        var: config.api_key_env.clone(),
                    })?;
                Self::direct(
                    &config.base_url,
                    config.auth_mode,
                    api_key,
                    config.timeout(),
                )
            }
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "dispatching completion");

        let mut http_request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json");
        if let Some(credential) = &self.credential {
            http_request = add_auth_headers(http_request, credential.mode, &credential.api_key);
        }

        let response = http_request.json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        extract_reply_text(&body).ok_or(TransportError::MalformedBody)
    }
}
