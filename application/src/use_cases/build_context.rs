//! Context window builder
//!
//! Produces the bounded view of conversation history fed to a round, and
//! owns the rolling-summary lifecycle. The window never exceeds one
//! optional summary line, the six most recent messages, and the new user
//! message, so the token cost of a turn is independent of conversation age.
//!
//! Summarization is deliberately asynchronous: when a conversation first
//! outgrows the recent window, the current turn proceeds with a degraded
//! context (just the new message) while [`ContextWindowBuilder::spawn_summary`]
//! regenerates the summary in the background. Summary failures are logged
//! and swallowed; the next turn simply degrades again.

use crate::ports::conversation_store::{ConversationStore, MessageRole, StoreError};
use crate::ports::generation_gateway::{GatewayError, GenerationGateway, TextOptions};
use roundtable_domain::{ChatMessage, PromptTemplate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of recent messages retained verbatim in the context window.
pub const RECENT_WINDOW: usize = 6;

/// Sampling temperature for summary generation; low for faithfulness.
const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 200;

/// A bounded context window for one turn
#[derive(Debug, Clone)]
pub struct ContextWindow {
    /// At most: 1 summary + RECENT_WINDOW recent + 1 new message
    pub messages: Vec<ChatMessage>,
    /// The caller should trigger [`ContextWindowBuilder::spawn_summary`]
    pub should_generate_summary: bool,
}

/// Errors from context assembly or summary generation
#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Builds bounded context windows and manages rolling summaries
pub struct ContextWindowBuilder<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
}

impl<S, G> Clone for ContextWindowBuilder<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<S, G> ContextWindowBuilder<S, G>
where
    S: ConversationStore + 'static,
    G: GenerationGateway + 'static,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self { store, gateway }
    }

    /// Assemble the context window for a new user message.
    ///
    /// If the conversation has outgrown the recent window but no summary
    /// exists yet, the window degrades to just the new message and
    /// `should_generate_summary` is set; the caller proceeds with the
    /// degraded window rather than blocking on summarization.
    pub async fn build(
        &self,
        conversation_id: &str,
        new_message: &str,
    ) -> Result<ContextWindow, ContextError> {
        let recent = self
            .store
            .recent_messages(conversation_id, RECENT_WINDOW)
            .await?;
        let total = self.store.message_count(conversation_id).await?;
        let summary = self.store.summary(conversation_id).await?;

        if total > RECENT_WINDOW && summary.is_none() {
            debug!(
                "Conversation {} has {} messages and no summary; degrading context",
                conversation_id, total
            );
            return Ok(ContextWindow {
                messages: vec![ChatMessage::user(new_message)],
                should_generate_summary: true,
            });
        }

        let mut messages = Vec::with_capacity(recent.len() + 2);

        if let Some(summary) = summary {
            messages.push(ChatMessage::system(PromptTemplate::summary_context(
                &summary,
            )));
        }

        // The store returns newest first; the model wants chronological.
        for msg in recent.into_iter().rev() {
            messages.push(match msg.role {
                MessageRole::User => ChatMessage::user(msg.content),
                MessageRole::Agent => ChatMessage::assistant(msg.content),
            });
        }

        messages.push(ChatMessage::user(new_message));

        Ok(ContextWindow {
            messages,
            should_generate_summary: false,
        })
    }

    /// Summarize everything older than the recent window and persist it
    /// onto the conversation's summary field.
    ///
    /// Returns the stored summary text, or an empty string when there is
    /// nothing old enough to summarize.
    pub async fn generate_and_store_summary(
        &self,
        conversation_id: &str,
    ) -> Result<String, ContextError> {
        let older = self
            .store
            .messages_before_recent(conversation_id, RECENT_WINDOW)
            .await?;

        if older.is_empty() {
            return Ok(String::new());
        }

        let transcript = older
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    MessageRole::User => "User",
                    MessageRole::Agent => "AI",
                };
                format!("{}: {}", speaker, m.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let options = TextOptions::default()
            .with_temperature(SUMMARY_TEMPERATURE)
            .with_max_tokens(SUMMARY_MAX_TOKENS)
            .with_system_prompt(PromptTemplate::summary_system());

        let generated = self
            .gateway
            .generate_text_with_fallback(&PromptTemplate::summary_request(&transcript), options)
            .await?;

        self.store
            .store_summary(conversation_id, &generated.text)
            .await?;

        debug!(
            "Stored summary for {} via provider {}",
            conversation_id, generated.provider
        );

        Ok(generated.text)
    }

    /// Dispatch summary regeneration without blocking the current turn.
    ///
    /// Best-effort contract: the returned handle can be awaited by tests,
    /// but production callers drop it. Failures are logged, never surfaced;
    /// a missing summary degrades the next turn's context instead.
    pub fn spawn_summary(&self, conversation_id: &str) -> tokio::task::JoinHandle<()> {
        let builder = self.clone();
        let conversation_id = conversation_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = builder.generate_and_store_summary(&conversation_id).await {
                warn!("Summary generation for {} failed: {}", conversation_id, e);
            }
        })
    }
}
