use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults;

/// Which endpoint the conversation pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// POST to the relay's `/api/chat`.
    #[default]
    Relay,
    /// POST straight to an OpenAI-compatible provider with an API key.
    Direct,
}

/// How an API key is presented to a directly called provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    #[default]
    Bearer,
    XApiKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub route: Route,
    /// Full URL of the relay endpoint (relay route).
    pub relay_url: String,
    /// Provider base URL; `chat/completions` is appended (direct route).
    pub base_url: String,
    /// Environment variable holding the provider API key (direct route).
    pub api_key_env: String,
    pub auth_mode: AuthMode,
    pub model: String,
    pub temperature: f32,
    pub stream: bool,
    pub timeout_secs: u64,
    /// Send earlier turns along with the latest message.
    pub include_history: bool,
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            route: Route::default(),
            relay_url: defaults::RELAY_URL.to_string(),
            base_url: defaults::DIRECT_BASE_URL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            auth_mode: AuthMode::default(),
            model: defaults::MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            stream: true,
            timeout_secs: defaults::TIMEOUT_SECS,
            include_history: false,
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub upstream_url: String,
    pub timeout_secs: u64,
    /// Environment variable holding a bearer token for the upstream, if any.
    pub bearer_token_env: Option<String>,
    /// Headers attached to every forwarded request. Replaces the defaults
    /// entirely when set.
    pub headers: BTreeMap<String, String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: defaults::RELAY_HOST.to_string(),
            port: defaults::RELAY_PORT,
            upstream_url: defaults::UPSTREAM_URL.to_string(),
            timeout_secs: defaults::TIMEOUT_SECS,
            bearer_token_env: None,
            headers: defaults::upstream_headers(),
        }
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub relay: RelayConfig,
    /// Extra exact-match replies layered over the built-in table.
    pub canned_replies: BTreeMap<String, String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/liaoyu/config.toml` → `~/.config/liaoyu/config.toml`
/// - Windows: `C:\\Users\\user\\AppData\\Roaming\\liaoyu\\config.toml` stays as-is
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
