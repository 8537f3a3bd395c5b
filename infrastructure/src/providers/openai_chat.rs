//! Shared OpenAI-compatible chat-completions wire format
//!
//! Groq, OpenRouter, and AI/ML API all speak the same `/chat/completions`
//! shape; this module holds the request/response types, the message-list
//! assembly, and the POST helper with transport-error classification.

use crate::providers::DEFAULT_TEXT_SYSTEM_PROMPT;
use roundtable_application::{ProviderError, TextOptions};
use roundtable_domain::{GenerationRequest, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

impl WireMessage {
    fn role_str(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// system prompt + bounded history + new user prompt
pub fn request_messages(request: &GenerationRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(WireMessage {
        role: "system",
        content: request.agent.system_prompt.clone(),
    });
    for msg in &request.history {
        messages.push(WireMessage {
            role: WireMessage::role_str(msg.role),
            content: msg.content.clone(),
        });
    }
    messages.push(WireMessage {
        role: "user",
        content: request.prompt.clone(),
    });
    messages
}

/// system prompt (caller-supplied or default) + single user prompt
pub fn text_messages(prompt: &str, options: &TextOptions) -> Vec<WireMessage> {
    vec![
        WireMessage {
            role: "system",
            content: options
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_SYSTEM_PROMPT.to_string()),
        },
        WireMessage {
            role: "user",
            content: prompt.to_string(),
        },
    ]
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// POST a chat-completions request and extract the first choice's content.
///
/// `label` names the backend in diagnostic messages. Non-success statuses
/// carry the raw backend error body; 429 is classified as rate limiting
/// regardless of body wording.
pub async fn post_chat(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    extra_headers: &[(&'static str, String)],
    label: &'static str,
    model: &str,
    messages: &[WireMessage],
    temperature: f32,
    max_tokens: u32,
) -> Result<String, ProviderError> {
    let body = ChatRequest {
        model,
        messages,
        temperature,
        max_tokens,
    };

    let mut builder = http.post(url).bearer_auth(api_key).json(&body);
    for (name, value) in extra_headers {
        builder = builder.header(*name, value);
    }

    let response = builder.send().await.map_err(classify_transport)?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited(format!("{label}: {text}")));
        }
        return Err(ProviderError::Backend {
            status: Some(status.as_u16()),
            message: format!("{label} error: {} - {}", status.as_u16(), text),
        });
    }

    let parsed: ChatResponse = response.json().await.map_err(|e| ProviderError::Backend {
        status: None,
        message: format!("{label} returned malformed JSON: {e}"),
    })?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default())
}

/// Map reqwest transport failures onto structured provider errors.
pub fn classify_transport(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else if error.is_connect() {
        ProviderError::Network(format!("connection refused: {error}"))
    } else {
        ProviderError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{AgentProfile, ChatMessage};

    fn sample_request() -> GenerationRequest {
        let agent = AgentProfile {
            id: "mentor".into(),
            name: "The Mentor".into(),
            system_prompt: "Be kind.".into(),
            temperature: 0.6,
        };
        GenerationRequest::new("What now?", agent).with_history(vec![
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi there"),
        ])
    }

    #[test]
    fn test_request_messages_order_and_roles() {
        let messages = request_messages(&sample_request());
        let roles: Vec<&str> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "Be kind.");
        assert_eq!(messages.last().unwrap().content, "What now?");
    }

    #[test]
    fn test_text_messages_fall_back_to_default_system_prompt() {
        let messages = text_messages("summarize this", &TextOptions::default());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, DEFAULT_TEXT_SYSTEM_PROMPT);

        let custom = TextOptions::default().with_system_prompt("Be terse.");
        let messages = text_messages("summarize this", &custom);
        assert_eq!(messages[0].content, "Be terse.");
    }
}
