use crate::api::ChatMessage;
use crate::core::message::{Message, Sender};

/// Append-only, ordered record of a conversation.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    entries: Vec<Message>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.entries.clone()
    }

    /// API turns for every committed entry, oldest first.
    pub fn as_api_messages(&self) -> Vec<ChatMessage> {
        self.entries
            .iter()
            .map(|message| match message.sender {
                Sender::User => ChatMessage::user(message.text.clone()),
                Sender::Assistant => ChatMessage::assistant(message.text.clone()),
            })
            .collect()
    }
}
