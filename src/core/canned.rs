//! Canned replies
//!
//! Known prompts are answered from a fixed table before any request leaves
//! the process. The built-in table ships with the binary (`builtin_replies.toml`)
//! and can be extended or overridden from the `[canned_replies]` config section.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct BuiltinReply {
    prompt: String,
    reply: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinRepliesConfig {
    #[serde(default)]
    replies: Vec<BuiltinReply>,
}

/// Exact-match prompt → reply table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CannedReplyTable {
    replies: HashMap<String, String>,
}

impl CannedReplyTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the table embedded at build time.
    pub fn builtin() -> Result<Self, toml::de::Error> {
        const CONFIG_CONTENT: &str = include_str!("../builtin_replies.toml");

        let config: BuiltinRepliesConfig = toml::from_str(CONFIG_CONTENT)?;
        let replies = config
            .replies
            .into_iter()
            .map(|entry| (entry.prompt.trim().to_string(), entry.reply))
            .collect();
        Ok(Self { replies })
    }

    /// Layer extra entries on top; keys already present are replaced.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (prompt, reply) in overrides {
            let prompt = prompt.trim().to_string();
            if prompt.is_empty() || reply.trim().is_empty() {
                continue;
            }
            self.replies.insert(prompt, reply);
        }
        self
    }

    /// Look up the trimmed input. Matching is exact and case-sensitive.
    pub fn lookup(&self, input: &str) -> Option<&str> {
        self.replies.get(input.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

impl FromIterator<(String, String)> for CannedReplyTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::empty().with_overrides(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_contains_greeting() {
        let table = CannedReplyTable::builtin().unwrap();
        assert_eq!(table.len(), 2);

        let greeting = table.lookup("你好").expect("greeting should be canned");
        assert!(greeting.starts_with("你好，我是你的AI小怪兽。"));
        assert!(greeting.contains("\n\n"));
    }

    #[test]
    fn lookup_trims_input_but_is_otherwise_exact() {
        let table = CannedReplyTable::builtin().unwrap();
        assert!(table.lookup("  你好\n").is_some());
        assert!(table.lookup("你好呀").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn overrides_replace_and_extend_entries() {
        let table = CannedReplyTable::builtin().unwrap().with_overrides([
            ("你好".to_string(), "嗨！".to_string()),
            ("晚安".to_string(), "晚安，好梦。".to_string()),
            ("   ".to_string(), "ignored".to_string()),
            ("空回复".to_string(), "  ".to_string()),
        ]);

        assert_eq!(table.lookup("你好"), Some("嗨！"));
        assert_eq!(table.lookup("晚安"), Some("晚安，好梦。"));
        assert_eq!(table.lookup("空回复"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn collects_from_pairs() {
        let table: CannedReplyTable = [("ping".to_string(), "pong".to_string())]
            .into_iter()
            .collect();
        assert_eq!(table.lookup("ping"), Some("pong"));
        assert!(!table.is_empty());
    }
}
