//! Hugging Face Inference API adapter
//!
//! The serverless inference endpoint takes a single flattened prompt and
//! returns `[{"generated_text": ...}]`. History is rendered as a labeled
//! transcript ending in an `Assistant:` cue.

use super::ProviderAdapter;
use super::openai_chat::classify_transport;
use crate::credentials;
use async_trait::async_trait;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{
    GenerationRequest, GenerationResult, ProviderId, Role, estimate_tokens,
};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str =
    "https://api-inference.huggingface.co/models/meta-llama/Llama-3.2-3B-Instruct";
/// Small hosted model; kept to short completions.
const GENERATE_MAX_TOKENS: u32 = 80;

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct InferenceOutput {
    #[serde(default)]
    generated_text: String,
}

pub struct HuggingFaceAdapter {
    http: reqwest::Client,
}

impl HuggingFaceAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn flatten_prompt(request: &GenerationRequest) -> String {
        let mut transcript = format!("{}\n\n", request.agent.system_prompt);
        for msg in &request.history {
            let label = match msg.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
                Role::System => "Context",
            };
            transcript.push_str(&format!("{}: {}\n", label, msg.content));
        }
        transcript.push_str(&format!("\nUser: {}\n\nAssistant:", request.prompt));
        transcript
    }

    async fn call(
        &self,
        prompt: String,
        temperature: f32,
        max_new_tokens: u32,
    ) -> Result<String, ProviderError> {
        let credential = credentials::resolve(ProviderId::HuggingFace)?;
        let url = credential
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                temperature,
                max_new_tokens,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&credential.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(format!(
                    "HuggingFace API: {text}"
                )));
            }
            return Err(ProviderError::Backend {
                status: Some(status.as_u16()),
                message: format!("HuggingFace API error: {} - {}", status.as_u16(), text),
            });
        }

        let parsed: Vec<InferenceOutput> =
            response.json().await.map_err(|e| ProviderError::Backend {
                status: None,
                message: format!("HuggingFace API returned malformed JSON: {e}"),
            })?;

        Ok(parsed
            .into_iter()
            .next()
            .map(|output| output.generated_text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProviderAdapter for HuggingFaceAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ProviderError> {
        let content = self
            .call(
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
        let full_prompt = match &options.system_prompt {
            Some(system) => format!("{}\n\nUser: {}\n\nAssistant:", system, prompt),
            None => format!("User: {}\n\nAssistant:", prompt),
        };

        self.call(full_prompt, options.temperature, options.max_tokens)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{AgentProfile, ChatMessage};

    #[test]
    fn test_flatten_prompt_ends_with_assistant_cue() {
        let agent = AgentProfile {
            id: "operator".into(),
            name: "The Operator".into(),
            system_prompt: "Get it done.".into(),
            temperature: 0.4,
        };
        let request = GenerationRequest::new("Plan the week", agent)
            .with_history(vec![ChatMessage::user("context")]);

        let prompt = HuggingFaceAdapter::flatten_prompt(&request);
        assert!(prompt.starts_with("Get it done.\n\n"));
        assert!(prompt.contains("User: context\n"));
        assert!(prompt.ends_with("User: Plan the week\n\nAssistant:"));
    }
}
