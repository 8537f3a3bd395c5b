//! Monthly usage metering decisions
//!
//! The durable usage counter lives with the persistence collaborator; the
//! domain only decides whether a count is within the tier's quota.

use crate::persona::tier::SubscriptionTier;
use serde::Serialize;

/// Outcome of a usage-limit check
#[derive(Debug, Clone, Serialize)]
pub struct UsageCheck {
    pub allowed: bool,
    pub current_usage: u32,
    /// `None` means unlimited (ENTERPRISE)
    pub limit: Option<u32>,
}

impl UsageCheck {
    /// Evaluate a month-to-date discussion count against the tier quota.
    pub fn evaluate(tier: SubscriptionTier, current_usage: u32) -> Self {
        let limit = tier.monthly_discussion_limit();
        let allowed = match limit {
            Some(limit) => current_usage < limit,
            None => true,
        };
        Self {
            allowed,
            current_usage,
            limit,
        }
    }

    /// Discussions remaining this month, if the tier is metered.
    pub fn remaining(&self) -> Option<u32> {
        self.limit.map(|l| l.saturating_sub(self.current_usage))
    }
}
