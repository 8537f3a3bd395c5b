//! Provider identifiers (Value Object)
//!
//! The set of remote text-generation backends is closed and known at
//! compile time. [`ProviderId::PRIORITY`] is the global fallback order:
//! cheaper and faster backends come first.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One remote text-generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Groq,
    Google,
    OpenRouter,
    HuggingFace,
    Aimlapi,
}

impl ProviderId {
    /// Global priority order for fallback chains.
    pub const PRIORITY: [ProviderId; 5] = [
        ProviderId::Groq,
        ProviderId::Google,
        ProviderId::OpenRouter,
        ProviderId::HuggingFace,
        ProviderId::Aimlapi,
    ];

    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Groq => "groq",
            ProviderId::Google => "google",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::HuggingFace => "huggingface",
            ProviderId::Aimlapi => "aimlapi",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(ProviderId::Groq),
            "google" => Ok(ProviderId::Google),
            "openrouter" => Ok(ProviderId::OpenRouter),
            "huggingface" => Ok(ProviderId::HuggingFace),
            "aimlapi" => Ok(ProviderId::Aimlapi),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_all_providers() {
        assert_eq!(ProviderId::PRIORITY.len(), 5);
        assert_eq!(ProviderId::PRIORITY[0], ProviderId::Groq);
        assert_eq!(ProviderId::PRIORITY[4], ProviderId::Aimlapi);
    }

    #[test]
    fn test_roundtrip() {
        for provider in ProviderId::PRIORITY {
            let parsed: ProviderId = provider.as_str().parse().unwrap();
            assert_eq!(provider, parsed);
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = "openai".parse::<ProviderId>();
        assert!(matches!(result, Err(DomainError::UnknownProvider(_))));
    }
}
