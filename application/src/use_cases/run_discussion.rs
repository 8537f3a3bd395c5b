//! Run discussion use case
//!
//! Coordinates one round: one user prompt answered by N selected personas.
//! Selection is validated against the caller's tier before anything is
//! dispatched, then each persona's generation runs as its own fallback
//! chain, all concurrently. A persona whose chain fails is omitted from
//! the result list; it never aborts the others.

use crate::ports::generation_gateway::GenerationGateway;
use roundtable_domain::{
    AgentProfile, ChatMessage, DomainError, GenerationRequest, GenerationResult, ProviderId,
    SubscriptionTier, resolve_selection,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can abort a whole round before generation starts
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error(transparent)]
    Selection(#[from] DomainError),
}

/// Input for the RunDiscussion use case
#[derive(Debug, Clone)]
pub struct RunDiscussionInput {
    /// The user prompt for this round
    pub prompt: String,
    /// Requested persona ids (unknown ids are dropped during resolution)
    pub persona_ids: Vec<String>,
    /// Caller's subscription tier, used for selection gating
    pub tier: SubscriptionTier,
    /// Bounded conversation history from the context window builder
    pub history: Vec<ChatMessage>,
    /// Optional provider promoted to the front of every fallback chain
    pub preferred_provider: Option<ProviderId>,
}

impl RunDiscussionInput {
    pub fn new(prompt: impl Into<String>, persona_ids: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            persona_ids,
            tier: SubscriptionTier::default(),
            history: Vec::new(),
            preferred_provider: None,
        }
    }

    pub fn with_tier(mut self, tier: SubscriptionTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_preferred_provider(mut self, provider: ProviderId) -> Self {
        self.preferred_provider = Some(provider);
        self
    }
}

/// Use case for running one discussion round
pub struct RunDiscussionUseCase<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: GenerationGateway + 'static> RunDiscussionUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute one round.
    ///
    /// Returns the successful generations only. Callers must treat a
    /// result list shorter than the requested persona set as a partial
    /// round, not a hard error.
    pub async fn execute(
        &self,
        input: RunDiscussionInput,
    ) -> Result<Vec<GenerationResult>, RunDiscussionError> {
        let personas = resolve_selection(&input.persona_ids, input.tier)?;

        info!("Starting round with {} personas", personas.len());

        let mut join_set = JoinSet::new();

        for persona in personas {
            let gateway = Arc::clone(&self.gateway);
            let request = GenerationRequest::new(input.prompt.clone(), AgentProfile::from(persona))
                .with_history(input.history.clone());
            let preferred = input.preferred_provider;
            let agent_id = persona.id;

            join_set.spawn(async move {
                let result = gateway.generate_with_fallback(request, preferred).await;
                (agent_id, result)
            });
        }

        let mut responses = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((agent_id, Ok(result))) => {
                    info!(
                        "Persona {} responded via provider {}",
                        agent_id, result.provider
                    );
                    responses.push(result);
                }
                Ok((agent_id, Err(e))) => {
                    warn!("Persona {} failed: {}", agent_id, e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        Ok(responses)
    }
}
