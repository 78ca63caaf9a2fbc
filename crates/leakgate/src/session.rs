//! Conversation history for one firewall-guarded session.
//!
//! History holds only content that has been through a completed
//! sanitization pass; the gateway owns the append path in the shipped
//! flow. The system prompt is carried alongside history, not inside it,
//! so clearing the conversation never loses it.

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The standing instruction to the model.
    System,
    /// The human participant.
    User,
    /// The model.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the content.
    pub role: Role,
    /// Sanitized message text.
    pub content: String,
}

impl Message {
    /// Create a new message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered message history plus the session's system prompt.
#[derive(Debug, Clone)]
pub struct Conversation {
    system_prompt: String,
    history: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
        }
    }

    /// The session's system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Append a message to the history.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(Message::new(role, content));
    }

    /// The ordered history.
    #[must_use]
    pub fn snapshot(&self) -> &[Message] {
        &self.history
    }

    /// Drop all history. The system prompt is unaffected.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of messages in the history.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if the history is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
