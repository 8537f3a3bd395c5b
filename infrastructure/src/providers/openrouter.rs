//! OpenRouter adapter (OpenAI-compatible chat completions)
//!
//! OpenRouter asks callers to identify themselves via `HTTP-Referer` and
//! `X-Title` headers; the referer can be overridden with `APP_URL`.

use super::ProviderAdapter;
use super::openai_chat::{post_chat, request_messages, text_messages};
use crate::credentials;
use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId, estimate_tokens};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const MODEL: &str = "google/gemini-2.0-flash-001";
const GENERATE_MAX_TOKENS: u32 = 2048;

pub struct OpenRouterAdapter {
    http: reqwest::Client,
}

impl OpenRouterAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn endpoint(base_url: Option<&str>) -> String {
        format!(
            "{}/chat/completions",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
        )
    }

    fn attribution_headers() -> Vec<(&'static str, String)> {
        let referer =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        vec![
            ("HTTP-Referer", referer),
            ("X-Title", "Roundtable".to_string()),
        ]
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenRouter
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
            &Self::attribution_headers(),
            "OpenRouter API",
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
            &Self::attribution_headers(),
            "OpenRouter API",
            MODEL,
            &messages,
            options.temperature,
            options.max_tokens,
        )
        .await
    }
}
