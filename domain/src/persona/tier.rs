//! Subscription tier value object
//!
//! Tiers form a strict hierarchy (`FREE < STARTER < PRO < ENTERPRISE`).
//! A persona is accessible iff its required tier is at or below the
//! caller's tier; `Ord` on the enum encodes the ranking.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Subscription level controlling persona access and usage limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    /// Get the string identifier for this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Starter => "STARTER",
            SubscriptionTier::Pro => "PRO",
            SubscriptionTier::Enterprise => "ENTERPRISE",
        }
    }

    /// Maximum number of personas selectable in a single round.
    pub fn max_selectable(&self) -> usize {
        match self {
            SubscriptionTier::Free => 3,
            SubscriptionTier::Starter => 5,
            SubscriptionTier::Pro | SubscriptionTier::Enterprise => 10,
        }
    }

    /// Monthly discussion quota. `None` means unlimited.
    pub fn monthly_discussion_limit(&self) -> Option<u32> {
        match self {
            SubscriptionTier::Free => Some(10),
            SubscriptionTier::Starter => Some(100),
            SubscriptionTier::Pro => Some(1000),
            SubscriptionTier::Enterprise => None,
        }
    }
}

impl Default for SubscriptionTier {
    fn default() -> Self {
        SubscriptionTier::Free
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FREE" => Ok(SubscriptionTier::Free),
            "STARTER" => Ok(SubscriptionTier::Starter),
            "PRO" => Ok(SubscriptionTier::Pro),
            "ENTERPRISE" => Ok(SubscriptionTier::Enterprise),
            other => Err(DomainError::UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(SubscriptionTier::Free < SubscriptionTier::Starter);
        assert!(SubscriptionTier::Starter < SubscriptionTier::Pro);
        assert!(SubscriptionTier::Pro < SubscriptionTier::Enterprise);
    }

    #[test]
    fn test_max_selectable_table() {
        assert_eq!(SubscriptionTier::Free.max_selectable(), 3);
        assert_eq!(SubscriptionTier::Starter.max_selectable(), 5);
        assert_eq!(SubscriptionTier::Pro.max_selectable(), 10);
        assert_eq!(SubscriptionTier::Enterprise.max_selectable(), 10);
    }

    #[test]
    fn test_monthly_limits() {
        assert_eq!(SubscriptionTier::Free.monthly_discussion_limit(), Some(10));
        assert_eq!(
            SubscriptionTier::Enterprise.monthly_discussion_limit(),
            None
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "pro".parse::<SubscriptionTier>().unwrap(),
            SubscriptionTier::Pro
        );
        assert!("platinum".parse::<SubscriptionTier>().is_err());
    }
}
