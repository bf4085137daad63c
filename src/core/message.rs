use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_assistant(self) -> bool {
        self == Sender::Assistant
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "assistant" => Ok(Sender::Assistant),
            _ => Err(format!("invalid message sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// Timeline entry identifier. Ordered by creation within one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out time-derived ids, bumping past the previous one when two
/// messages land in the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicI64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> MessageId {
        let candidate = now.timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(previous + 1);
            match self
                .last
                .compare_exchange_weak(previous, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return MessageId(next),
                Err(actual) => previous = actual,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(ids: &MessageIdGenerator, sender: Sender, text: impl Into<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: ids.next_id(timestamp),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn user(ids: &MessageIdGenerator, text: impl Into<String>) -> Self {
        Self::new(ids, Sender::User, text)
    }

    pub fn assistant(ids: &MessageIdGenerator, text: impl Into<String>) -> Self {
        Self::new(ids, Sender::Assistant, text)
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.sender.is_assistant()
    }

    /// Blank-line separated paragraphs, for renderers that space them apart.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
    }
}
