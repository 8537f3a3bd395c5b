//! Domain layer for roundtable
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A round is one user prompt answered by several personas in parallel.
//! Each persona is a fixed agent definition (system prompt + temperature +
//! tier gate) representing one reasoning style.
//!
//! ## Providers
//!
//! Generation is served by a closed set of remote backends tried in a fixed
//! priority order. The domain only knows their identifiers; the wire
//! adapters live in the infrastructure layer.

pub mod core;
pub mod generation;
pub mod persona;
pub mod prompt;
pub mod provider;
pub mod usage;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use generation::{
    AgentProfile, ChatMessage, GenerationRequest, GenerationResult, Role, estimate_tokens,
};
pub use persona::{
    entities::Persona,
    registry::{accessible_personas, all_personas, persona_by_id, resolve_selection},
    tier::SubscriptionTier,
};
pub use prompt::PromptTemplate;
pub use provider::ProviderId;
pub use usage::UsageCheck;
