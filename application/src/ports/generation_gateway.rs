//! Generation gateway port
//!
//! Defines how the application layer reaches the multi-provider generation
//! router. The infrastructure implementation tries backends in priority
//! order with caching and timeout control; use cases only see the final
//! outcome and which provider served it.

use async_trait::async_trait;
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId};
use thiserror::Error;

/// Failure of a single provider attempt.
///
/// Variants are structured rather than substring-matched: each adapter
/// classifies its own transport and backend failures at the wire boundary,
/// so the router's retry decision does not depend on backend wording.
/// [`ProviderError::Backend`] still carries the raw backend error text for
/// diagnostics.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Required credential absent; raised before any network attempt.
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The backend returned HTTP success with no usable content.
    #[error("Empty response")]
    EmptyResponse,

    /// Any other backend rejection, with the raw error text preserved.
    #[error("Backend error: {message}")]
    Backend { status: Option<u16>, message: String },
}

impl ProviderError {
    /// Whether the fallback chain should move on to the next provider.
    ///
    /// Timeouts, rate limiting, network failures, and empty responses are
    /// transient per backend. A missing credential or any other backend
    /// rejection aborts the chain: the remaining providers would most
    /// likely fail the same way, or the request itself is malformed.
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::Timeout
            | ProviderError::RateLimited(_)
            | ProviderError::Network(_)
            | ProviderError::EmptyResponse => true,
            ProviderError::MissingCredential(_) => false,
            ProviderError::Backend { status, message } => {
                if *status == Some(429) {
                    return true;
                }
                let message = message.to_lowercase();
                message.contains("429")
                    || message.contains("rate limit")
                    || message.contains("timeout")
                    || message.contains("network")
                    || message.contains("connection refused")
                    || message.contains("empty")
            }
        }
    }
}

/// Failure of a whole fallback chain, as seen by use cases.
///
/// Per-provider causes are logged inside the router, never propagated:
/// callers only learn that generation is unavailable, or that a required
/// credential is missing.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Configuration(String),

    #[error("AI services temporarily unavailable")]
    Unavailable,
}

/// Options for the plain-text generation path (no persona, no history)
#[derive(Debug, Clone)]
pub struct TextOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    pub preferred_provider: Option<ProviderId>,
}

impl Default for TextOptions {
    /// Defaults match the auxiliary-task profile: temperature 0.7,
    /// short 120-token responses, generic assistant system prompt.
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 120,
            system_prompt: None,
            preferred_provider: None,
        }
    }
}

impl TextOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_preferred_provider(mut self, provider: ProviderId) -> Self {
        self.preferred_provider = Some(provider);
        self
    }
}

/// Plain-text generation outcome with the serving provider
#[derive(Debug, Clone)]
pub struct TextGeneration {
    pub text: String,
    pub provider: ProviderId,
}

/// Gateway to the provider fallback router
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate a persona response, trying providers in priority order.
    ///
    /// If `preferred` is given it is promoted to the front of the chain;
    /// the remaining order is preserved. The returned result carries the
    /// provider that ultimately served the request.
    async fn generate_with_fallback(
        &self,
        request: GenerationRequest,
        preferred: Option<ProviderId>,
    ) -> Result<GenerationResult, GatewayError>;

    /// Single-shot text generation for auxiliary tasks (summaries,
    /// comparisons), with the same fallback algorithm.
    async fn generate_text_with_fallback(
        &self,
        prompt: &str,
        options: TextOptions,
    ) -> Result<TextGeneration, GatewayError>;

    /// The provider that served the most recent successful generation.
    /// Advisory only; racy across concurrent requests by design.
    fn last_provider(&self) -> Option<ProviderId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_variants_are_retriable() {
        assert!(ProviderError::Timeout.is_retriable());
        assert!(ProviderError::RateLimited("slow down".into()).is_retriable());
        assert!(ProviderError::Network("dns".into()).is_retriable());
        assert!(ProviderError::EmptyResponse.is_retriable());
    }

    #[test]
    fn test_missing_credential_is_not_retriable() {
        assert!(!ProviderError::MissingCredential("GROQ_API_KEY").is_retriable());
    }

    #[test]
    fn test_backend_429_is_retriable() {
        let error = ProviderError::Backend {
            status: Some(429),
            message: "Too Many Requests".into(),
        };
        assert!(error.is_retriable());
    }

    #[test]
    fn test_backend_rate_limit_text_is_retriable() {
        let error = ProviderError::Backend {
            status: Some(400),
            message: "model rate limit reached".into(),
        };
        assert!(error.is_retriable());
    }

    #[test]
    fn test_backend_auth_rejection_is_not_retriable() {
        let error = ProviderError::Backend {
            status: Some(401),
            message: "invalid api key".into(),
        };
        assert!(!error.is_retriable());
    }

    #[test]
    fn test_text_options_defaults() {
        let options = TextOptions::default();
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.max_tokens, 120);
        assert!(options.system_prompt.is_none());
        assert!(options.preferred_provider.is_none());
    }
}
