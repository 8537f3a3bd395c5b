//! Google Gemini adapter (Generative Language API)
//!
//! Gemini has no chat-completions shape: the system prompt travels as
//! `system_instruction` and the conversation history is flattened into a
//! single labeled transcript inside one user turn.

use super::{DEFAULT_TEXT_SYSTEM_PROMPT, ProviderAdapter};
use super::openai_chat::classify_transport;
use crate::credentials;
use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{
    GenerationRequest, GenerationResult, ProviderId, Role, estimate_tokens,
};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-2.0-flash";
const GENERATE_MAX_TOKENS: u32 = 2048;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiAdapter {
    http: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn endpoint(base_url: Option<&str>, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/'),
            MODEL,
            api_key
        )
    }

    /// Flatten bounded history into a labeled transcript ahead of the
    /// new prompt.
    fn flatten_prompt(request: &GenerationRequest) -> String {
        let history = request
            .history
            .iter()
            .map(|msg| {
                let label = match msg.role {
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                    Role::System => "Context",
                };
                format!("{}: {}", label, msg.content)
            })
            .collect::<Vec<_>>()
            .join("\n");

        if history.is_empty() {
            request.prompt.clone()
        } else {
            format!("{}\n\nUser: {}", history, request.prompt)
        }
    }

    async fn call(
        &self,
        system_prompt: &str,
        prompt: String,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError> {
        let credential = credentials::resolve(ProviderId::Google)?;
        let url = Self::endpoint(credential.base_url.as_deref(), &credential.api_key);

        let body = GeminiRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(format!("Gemini API: {text}")));
            }
            return Err(ProviderError::Backend {
                status: Some(status.as_u16()),
                message: format!("Gemini API error: {} - {}", status.as_u16(), text),
            });
        }

        let parsed: GeminiResponse =
            response.json().await.map_err(|e| ProviderError::Backend {
                status: None,
                message: format!("Gemini API returned malformed JSON: {e}"),
            })?;

        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ProviderError> {
        let content = self
            .call(
                &request.agent.system_prompt,
                Self::flatten_prompt(request),
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
        let system_prompt = options
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_TEXT_SYSTEM_PROMPT);

        self.call(
            system_prompt,
            prompt.to_string(),
            options.temperature,
            options.max_tokens,
        )
        .await
    }
}
