//! Authentication utilities for API requests
//!
//! This module provides utilities for adding provider-specific authentication
//! headers to HTTP requests.

use crate::core::config::AuthMode;

/// Add authentication headers to an HTTP request
///
/// - [`AuthMode::Bearer`]: standard `Authorization: Bearer <key>`
/// - [`AuthMode::XApiKey`]: `x-api-key: <key>`
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    mode: AuthMode,
    api_key: &str,
) -> reqwest::RequestBuilder {
    match mode {
        AuthMode::Bearer => request.header("Authorization", format!("Bearer {api_key}")),
        AuthMode::XApiKey => request.header("x-api-key", api_key),
    }
}
