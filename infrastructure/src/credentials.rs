//! Per-call credential resolution
//!
//! Credentials are read from the process environment at call time, not at
//! adapter construction, so rotating a key does not require a restart. A
//! missing key fails the attempt before any network call is made.

use roundtable_application::ProviderError;
use roundtable_domain::ProviderId;

/// Resolved credential for one backend call
#[derive(Debug, Clone)]
pub struct Credential {
    pub api_key: String,
    /// Optional endpoint override from `<PROVIDER>_BASE_URL`
    pub base_url: Option<String>,
}

/// Environment variable holding the API key for a provider.
pub fn api_key_var(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Groq => "GROQ_API_KEY",
        ProviderId::Google => "GOOGLE_AI_API_KEY",
        ProviderId::OpenRouter => "OPENROUTER_API_KEY",
        ProviderId::HuggingFace => "HUGGINGFACE_API_KEY",
        ProviderId::Aimlapi => "AIMLAPI_API_KEY",
    }
}

fn base_url_var(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Groq => "GROQ_BASE_URL",
        ProviderId::Google => "GOOGLE_AI_BASE_URL",
        ProviderId::OpenRouter => "OPENROUTER_BASE_URL",
        ProviderId::HuggingFace => "HUGGINGFACE_BASE_URL",
        ProviderId::Aimlapi => "AIMLAPI_BASE_URL",
    }
}

/// Resolve the credential for one call.
pub fn resolve(provider: ProviderId) -> Result<Credential, ProviderError> {
    let key_var = api_key_var(provider);
    let api_key = std::env::var(key_var)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(ProviderError::MissingCredential(key_var))?;

    let base_url = std::env::var(base_url_var(provider))
        .ok()
        .filter(|url| !url.is_empty());

    Ok(Credential { api_key, base_url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_the_variable() {
        // Safe: no test in this crate sets AIMLAPI_API_KEY.
        unsafe { std::env::remove_var("AIMLAPI_API_KEY") };
        let result = resolve(ProviderId::Aimlapi);
        assert!(matches!(
            result,
            Err(ProviderError::MissingCredential("AIMLAPI_API_KEY"))
        ));
    }
}
