//! Groq adapter (OpenAI-compatible chat completions)

use super::ProviderAdapter;
use super::openai_chat::{post_chat, request_messages, text_messages};
use crate::credentials;
use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId, estimate_tokens};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const MODEL: &str = "llama-3.3-70b-versatile";
/// Completion budget for persona responses; Groq is the cheap head of the
/// chain and kept short.
const GENERATE_MAX_TOKENS: u32 = 120;

pub struct GroqAdapter {
    http: reqwest::Client,
}

impl GroqAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn endpoint(base_url: Option<&str>) -> String {
        format!(
            "{}/chat/completions",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ProviderAdapter for GroqAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ProviderError> {
        let credential = credentials::resolve(self.id())?;
        let messages = request_messages(request);

        let content = post_chat(
            &self.http,
            &Self::endpoint(credential.base_url.as_deref()),
            &credential.api_key,
            &[],
            "Groq API",
            MODEL,
            &messages,
            request.agent.temperature,
            GENERATE_MAX_TOKENS,
        )
        .await?;

        Ok(GenerationResult {
            agent_id: request.agent.id.clone(),
            tokens_used: estimate_tokens(&content),
            content,
            provider: self.id(),
        })
    }

    async fn generate_text(
        &self,
        prompt: &str,
        options: &TextOptions,
    ) -> Result<String, ProviderError> {
        let credential = credentials::resolve(self.id())?;
        let messages = text_messages(prompt, options);

        post_chat(
            &self.http,
            &Self::endpoint(credential.base_url.as_deref()),
            &credential.api_key,
            &[],
            "Groq API",
            MODEL,
            &messages,
            options.temperature,
            options.max_tokens,
        )
        .await
    }
}
