//! # Conversation
//!
//! The ordered log of messages for the current session.
//!
//! ```text
//! Conversation
//! └── messages: Vec<Message>   // append-only, arrival order
//! ```
//!
//! Nothing here is persisted. The log lives as long as the `App` that owns it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the conversation. Immutable once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(Role::Assistant, content)
    }
}

/// Append-only message log.
///
/// There is deliberately no `remove`, `clear` or `get_mut`: the only way
/// in is one of the `append_*` methods, and entries never move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user message from `text` and appends it.
    pub fn append_user_message(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::user(text))
    }

    /// Appends a finished assistant message.
    ///
    /// Messages arriving with the wrong role are re-tagged as assistant so the
    /// log can't be polluted by a provider returning a user-role message.
    pub fn append_assistant_message(&mut self, mut message: Message) -> &Message {
        message.role = Role::Assistant;
        self.push(message)
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
