//! Prompt templates for auxiliary generation paths
//!
//! Persona prompts live in the catalog; the templates here cover the
//! plain-text paths: rolling summarization and response comparison.

/// Templates for the summarization and comparison flows
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for conversation summarization
    pub fn summary_system() -> &'static str {
        "You are a concise summarizer. Summarize conversations in 3-4 sentences \
preserving key decisions, conclusions and context."
    }

    /// User prompt asking for a rolling summary of older conversation turns
    pub fn summary_request(transcript: &str) -> String {
        format!(
            "Summarize this conversation in 3-4 sentences preserving key decisions, \
conclusions and context:\n\n{}",
            transcript
        )
    }

    /// System-role context line carrying an existing rolling summary
    pub fn summary_context(summary: &str) -> String {
        format!("Previous context: {}", summary)
    }

    /// System prompt for the response comparison flow
    pub fn compare_system() -> &'static str {
        "You are an expert at comparing and contrasting different perspectives.\n\
Analyze the given responses and identify key differences in approach, conclusions, and insights.\n\
Respond with a JSON array of strings, where each string is a key difference between the responses.\n\
Focus on meaningful differences that would help a user understand how the perspectives differ.\n\
Do not include any preamble or explanation - just the JSON array."
    }

    /// User prompt asking for the differences between two or three responses
    pub fn compare_request(response_a: &str, response_b: &str, response_c: Option<&str>) -> String {
        let mut prompt = format!(
            "Compare these AI persona responses and identify key differences:\n\n\
Response A:\n{}\n\nResponse B:\n{}",
            response_a, response_b
        );

        if let Some(c) = response_c {
            prompt.push_str(&format!("\n\nResponse C:\n{}", c));
        }

        prompt.push_str(
            "\n\nRespond as a JSON array of strings, where each string is a key difference. \
Example: [\"The Strategist focuses on ROI while the Mentor emphasizes personal growth\"]",
        );

        prompt
    }
}
