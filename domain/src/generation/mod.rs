//! Generation request/result types and token accounting
//!
//! These are the shapes exchanged between the orchestration layer and the
//! provider gateway. Nothing here is persisted by the core; the storage
//! collaborator owns durable conversations and messages.

use crate::persona::entities::Persona;
use crate::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation context window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message presented to a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The slice of a persona a provider adapter needs for one call
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub system_prompt: String,
    pub temperature: f32,
}

impl From<&Persona> for AgentProfile {
    fn from(persona: &Persona) -> Self {
        Self {
            id: persona.id.to_string(),
            name: persona.display_name.to_string(),
            system_prompt: persona.system_prompt.to_string(),
            temperature: persona.temperature,
        }
    }
}

/// One request to generate a persona response
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub agent: AgentProfile,
    /// Bounded conversation history, oldest first
    pub history: Vec<ChatMessage>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, agent: AgentProfile) -> Self {
        Self {
            prompt: prompt.into(),
            agent,
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// A successful persona generation (immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub agent_id: String,
    pub content: String,
    /// Estimated, not billed — see [`estimate_tokens`]
    pub tokens_used: u32,
    /// The backend that ultimately served this request
    pub provider: ProviderId,
}

/// Estimate the token count of generated text.
///
/// Backends do not uniformly report usage, so this is word count scaled by
/// a fixed 1.3x constant. Approximate by design; never use it for billing.
pub fn estimate_tokens(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    (words as f64 * 1.3).ceil() as u32
}
