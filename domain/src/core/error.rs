//! Domain error types

use crate::persona::tier::SubscriptionTier;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No valid personas selected")]
    NoValidPersonas,

    #[error("Persona '{persona}' requires the {required} tier or higher")]
    PersonaLocked {
        persona: String,
        required: SubscriptionTier,
    },

    #[error("The {tier} tier allows at most {max} personas per round")]
    TooManyPersonas { tier: SubscriptionTier, max: usize },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown tier: {0}")]
    UnknownTier(String),
}
