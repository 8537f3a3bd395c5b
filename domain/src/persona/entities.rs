//! Persona entity
//!
//! A persona is an immutable agent definition: one reasoning style, one
//! system prompt, one generation temperature. The catalog is fixed at
//! compile time; see [`crate::persona::registry`].

use crate::persona::tier::SubscriptionTier;
use serde::Serialize;

/// A named agent configuration representing one reasoning style
#[derive(Debug, Clone, Serialize)]
pub struct Persona {
    /// Unique key, stable across releases (persisted in message records)
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    /// Short tag describing how this persona reasons (e.g. "analytical")
    pub reasoning_style: &'static str,
    /// Generation randomness passed through to the provider
    pub temperature: f32,
    /// Minimum subscription tier required to select this persona
    pub required_tier: SubscriptionTier,
    /// Display color used by UI collaborators (hex)
    pub color: &'static str,
}

impl Persona {
    /// A persona is locked iff its required tier outranks the caller's.
    pub fn is_locked(&self, tier: SubscriptionTier) -> bool {
        self.required_tier > tier
    }
}
