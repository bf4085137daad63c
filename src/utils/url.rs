//! URL helpers for building completion endpoints.

/// Strip trailing slashes so endpoints can be appended safely.
///
/// ```
/// use liaoyu::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.deepseek.com/v1/"), "https://api.deepseek.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a provider base URL and an endpoint path with exactly one slash.
///
/// ```
/// use liaoyu::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.deepseek.com/v1/", "/chat/completions"),
///     "https://api.deepseek.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Parse `url` as an absolute `http`/`https` URL with a host.
///
/// ```
/// use liaoyu::utils::url::parse_http_url;
///
/// assert!(parse_http_url("http://localhost:3001/api/chat").is_some());
/// assert!(parse_http_url("http://chat example.com/completions").is_none());
/// ```
pub fn parse_http_url(url: &str) -> Option<reqwest::Url> {
    let parsed = reqwest::Url::parse(url.trim()).ok()?;
    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
    match parsed.scheme() {
        "http" | "https" if has_host => Some(parsed),
        _ => None,
    }
}
