//! AI/ML API adapter (OpenAI-compatible chat completions)

use super::ProviderAdapter;
use super::openai_chat::{post_chat, request_messages, text_messages};
use crate::credentials;
use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId, estimate_tokens};

const DEFAULT_BASE_URL: &str = "https://api.aimlapi.com/v1";
const MODEL: &str = "gpt-4o-mini";
const GENERATE_MAX_TOKENS: u32 = 2048;

pub struct AimlapiAdapter {
    http: reqwest::Client,
}

impl AimlapiAdapter {
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
impl ProviderAdapter for AimlapiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Aimlapi
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
            "AI/ML API",
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
            "AI/ML API",
            MODEL,
            &messages,
            options.temperature,
            options.max_tokens,
        )
        .await
    }
}
