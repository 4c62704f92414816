//! Chat History
//!
//! Assistant text and user prompts are not registry state. The engine hands
//! them to a [`ChatHistory`] collaborator; [`ChatLog`] keeps them in memory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::now_ms;

/// Who authored a chat entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the client
    User,
    /// The agent producing surfaces
    Agent,
}

/// One line of chat history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Unique entry ID
    pub id: Uuid,
    /// Author
    pub role: ChatRole,
    /// Text content
    pub content: String,
    /// Reasoning shown alongside an agent answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// When the entry was recorded (Unix timestamp ms)
    pub timestamp_ms: u64,
}

impl ChatEntry {
    /// Create an entry stamped now
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            reasoning: None,
            timestamp_ms: now_ms(),
        }
    }

    /// A user prompt
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// An agent answer
    pub fn agent(content: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            reasoning,
            ..Self::new(ChatRole::Agent, content)
        }
    }
}

/// Sink for chat entries
pub trait ChatHistory: Send + Sync {
    /// Append an entry
    fn record(&mut self, entry: ChatEntry);

    /// Entries in recording order
    fn entries(&self) -> &[ChatEntry];

    /// Forget every entry
    fn clear(&mut self);
}

/// In-memory chat history
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}

impl ChatHistory for ChatLog {
    fn record(&mut self, entry: ChatEntry) {
        tracing::debug!(role = ?entry.role, id = %entry.id, "Chat entry recorded");
        self.entries.push(entry);
    }

    fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
