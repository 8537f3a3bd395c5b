//! Conversation store port
//!
//! The durable relational store is an external collaborator; the core only
//! needs a narrow read/write surface over conversations: the recent tail
//! of messages, the total count, and the rolling summary field. No schema
//! validation happens here beyond shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who authored a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageRole {
    User,
    Agent,
}

/// One persisted conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: MessageRole,
    /// Persona id for agent messages, absent for user messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            agent_id: None,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn agent(agent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Agent,
            agent_id: Some(agent_id.into()),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Errors surfaced by the storage collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Io(String),
}

/// Data source/sink for conversations owned by the persistence collaborator
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append one message to a conversation, creating it if needed.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: StoredMessage,
    ) -> Result<(), StoreError>;

    /// The most recent `limit` messages, newest first.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError>;

    /// Total number of messages in the conversation.
    async fn message_count(&self, conversation_id: &str) -> Result<usize, StoreError>;

    /// All messages older than the newest `keep_recent`, oldest first.
    async fn messages_before_recent(
        &self,
        conversation_id: &str,
        keep_recent: usize,
    ) -> Result<Vec<StoredMessage>, StoreError>;

    /// The conversation's rolling summary, if one has been generated.
    async fn summary(&self, conversation_id: &str) -> Result<Option<String>, StoreError>;

    /// Replace the conversation's rolling summary.
    async fn store_summary(&self, conversation_id: &str, summary: &str) -> Result<(), StoreError>;
}
