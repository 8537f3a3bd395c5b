//! Compare responses use case
//!
//! PRO-and-above feature: given two or three persona responses from a
//! round, ask the text-generation path to list the key differences between
//! them. The model is instructed to answer with a JSON array of strings;
//! when it doesn't comply the raw text is split into lines instead.

use crate::ports::generation_gateway::{GatewayError, GenerationGateway, TextOptions};
use roundtable_domain::{PromptTemplate, SubscriptionTier};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const COMPARE_TEMPERATURE: f32 = 0.3;
const COMPARE_MAX_TOKENS: u32 = 1024;
/// Cap applied when falling back to line-splitting a non-JSON reply.
const FALLBACK_MAX_DIFFERENCES: usize = 5;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Compare mode is available on Pro and Enterprise plans")]
    TierNotAllowed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Input for the CompareResponses use case
#[derive(Debug, Clone)]
pub struct CompareResponsesInput {
    pub response_a: String,
    pub response_b: String,
    pub response_c: Option<String>,
    pub tier: SubscriptionTier,
}

impl CompareResponsesInput {
    pub fn new(
        response_a: impl Into<String>,
        response_b: impl Into<String>,
        tier: SubscriptionTier,
    ) -> Self {
        Self {
            response_a: response_a.into(),
            response_b: response_b.into(),
            response_c: None,
            tier,
        }
    }

    pub fn with_third_response(mut self, response_c: impl Into<String>) -> Self {
        self.response_c = Some(response_c.into());
        self
    }
}

/// Use case for comparing persona responses
pub struct CompareResponsesUseCase<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: GenerationGateway + 'static> CompareResponsesUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Compare the responses, returning one string per key difference.
    pub async fn execute(&self, input: CompareResponsesInput) -> Result<Vec<String>, CompareError> {
        if input.tier < SubscriptionTier::Pro {
            return Err(CompareError::TierNotAllowed);
        }

        let prompt = PromptTemplate::compare_request(
            &input.response_a,
            &input.response_b,
            input.response_c.as_deref(),
        );

        let options = TextOptions::default()
            .with_temperature(COMPARE_TEMPERATURE)
            .with_max_tokens(COMPARE_MAX_TOKENS)
            .with_system_prompt(PromptTemplate::compare_system());

        let generated = self
            .gateway
            .generate_text_with_fallback(&prompt, options)
            .await?;

        Ok(Self::parse_differences(&generated.text))
    }

    /// Parse the model reply: a JSON string array when the model complied,
    /// otherwise non-empty lines of the raw text, capped.
    fn parse_differences(text: &str) -> Vec<String> {
        match serde_json::from_str::<Vec<String>>(text) {
            Ok(differences) => differences,
            Err(_) => {
                debug!("Comparison reply was not a JSON array; splitting lines");
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .take(FALLBACK_MAX_DIFFERENCES)
                    .collect()
            }
        }
    }
}
