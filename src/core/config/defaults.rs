//! Built-in configuration values used when the config file is silent.

use std::collections::BTreeMap;

pub const RELAY_HOST: &str = "127.0.0.1";
pub const RELAY_PORT: u16 = 3001;
pub const RELAY_URL: &str = "http://localhost:3001/api/chat";
pub const UPSTREAM_URL: &str = "https://chat.hust.edu.cn/proxy-lt-671b/chat/completions";
pub const DIRECT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const API_KEY_ENV: &str = "LIAOYU_API_KEY";
pub const MODEL: &str = "deepseek-r1";
pub const TEMPERATURE: f32 = 0.6;
pub const TIMEOUT_SECS: u64 = 60;

pub const SYSTEM_PROMPT: &str = "你是一个温暖、富有同理心的AI疗愈助手。请用温和、支持性的语气与用户交流，帮助他们缓解压力、疏导情绪。";

/// Headers the default upstream expects before it will accept a request.
pub fn upstream_headers() -> BTreeMap<String, String> {
    [
        ("accept", "*/*"),
        ("accept-language", "en,zh;q=0.9,zh-CN;q=0.8,zh-TW;q=0.7"),
        ("content-type", "application/json"),
        (
            "sec-ch-ua",
            "\"Chromium\";v=\"136\", \"Google Chrome\";v=\"136\", \"Not.A/Brand\";v=\"99\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}
