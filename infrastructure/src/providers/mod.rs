//! Provider adapters
//!
//! One adapter per remote backend, each translating the generic generation
//! request into that backend's wire format. The set is closed; dispatch is
//! trait-object based over [`ProviderAdapter`], registered once at startup
//! in priority order by [`default_adapters`].

pub mod aimlapi;
pub mod gemini;
pub mod groq;
pub mod huggingface;
pub mod openai_chat;
pub mod openrouter;
pub mod router;

use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId};
use std::sync::Arc;

/// System prompt used by the plain-text path when the caller supplies none.
pub(crate) const DEFAULT_TEXT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Uniform capability over one remote text-generation backend.
///
/// Adapters are stateless per call: credentials come from the environment
/// at call time (see [`crate::credentials`]), and the only side effect is
/// the outbound network call.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Generate a persona response from a structured request.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<GenerationResult, ProviderError>;

    /// Single-shot plain-text generation for auxiliary tasks.
    async fn generate_text(
        &self,
        prompt: &str,
        options: &TextOptions,
    ) -> Result<String, ProviderError>;
}

/// All five adapters in global priority order, sharing one HTTP client.
pub fn default_adapters(http: reqwest::Client) -> Vec<Arc<dyn ProviderAdapter>> {
    vec![
        Arc::new(groq::GroqAdapter::new(http.clone())),
        Arc::new(gemini::GeminiAdapter::new(http.clone())),
        Arc::new(openrouter::OpenRouterAdapter::new(http.clone())),
        Arc::new(huggingface::HuggingFaceAdapter::new(http.clone())),
        Arc::new(aimlapi::AimlapiAdapter::new(http)),
    ]
}
