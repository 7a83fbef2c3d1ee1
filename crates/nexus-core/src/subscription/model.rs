use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::provider::CredentialSource;

/// Subscription tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Business,
}

/// Platform token and workflow allowances for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub tokens: u64,
    pub workflows: u32,
}

impl Tier {
    pub fn limits(self) -> TierLimits {
        match self {
            Tier::Free => TierLimits {
                tokens: 5_000,
                workflows: 1,
            },
            Tier::Pro => TierLimits {
                tokens: 50_000,
                workflows: 5,
            },
            Tier::Business => TierLimits {
                tokens: 200_000,
                workflows: 99,
            },
        }
    }
}

/// Running usage counters. The single source of truth for quota state.
///
/// Counters only grow here; resets belong to whoever owns billing periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUsage {
    pub tier: Tier,
    /// Tokens billed to the platform credential.
    pub tokens_used: u64,
    pub token_limit: u64,
    /// Tokens billed to the user's own credentials.
    pub byok_tokens_used: u64,
    pub workflows_used: u32,
    pub workflow_limit: u32,
}

impl SubscriptionUsage {
    pub fn new(tier: Tier) -> Self {
        let limits = tier.limits();
        Self {
            tier,
            tokens_used: 0,
            token_limit: limits.tokens,
            byok_tokens_used: 0,
            workflows_used: 0,
            workflow_limit: limits.workflows,
        }
    }

    /// Adds a turn's token total to exactly one counter, chosen by `source`.
    pub fn record(&mut self, source: CredentialSource, tokens: u32) {
        let counter = match source {
            CredentialSource::Platform => &mut self.tokens_used,
            CredentialSource::User => &mut self.byok_tokens_used,
        };
        *counter = counter.saturating_add(u64::from(tokens));
    }

    pub fn remaining_platform_tokens(&self) -> u64 {
        self.token_limit.saturating_sub(self.tokens_used)
    }

    pub fn is_over_limit(&self) -> bool {
        self.tokens_used >= self.token_limit
    }

    /// Switches tier, adopting the new tier's limits and keeping counters.
    pub fn set_tier(&mut self, tier: Tier) {
        let limits = tier.limits();
        self.tier = tier;
        self.token_limit = limits.tokens;
        self.workflow_limit = limits.workflows;
    }
}

impl Default for SubscriptionUsage {
    fn default() -> Self {
        Self::new(Tier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_limits() {
        assert_eq!(Tier::Free.limits().tokens, 5_000);
        assert_eq!(Tier::Pro.limits().workflows, 5);
        assert_eq!(Tier::Business.limits().tokens, 200_000);
        assert_eq!("pro".parse::<Tier>().unwrap(), Tier::Pro);
    }

    #[test]
    fn test_record_touches_exactly_one_counter() {
        let mut usage = SubscriptionUsage::new(Tier::Free);
        usage.record(CredentialSource::Platform, 300);
        assert_eq!(usage.tokens_used, 300);
        assert_eq!(usage.byok_tokens_used, 0);

        usage.record(CredentialSource::User, 42);
        assert_eq!(usage.tokens_used, 300);
        assert_eq!(usage.byok_tokens_used, 42);
    }

    #[test]
    fn test_record_saturates() {
        let mut usage = SubscriptionUsage::new(Tier::Free);
        usage.byok_tokens_used = u64::MAX - 1;
        usage.record(CredentialSource::User, 10);
        assert_eq!(usage.byok_tokens_used, u64::MAX);
    }

    #[test]
    fn test_remaining_and_over_limit() {
        let mut usage = SubscriptionUsage::new(Tier::Free);
        usage.record(CredentialSource::Platform, 4_900);
        assert_eq!(usage.remaining_platform_tokens(), 100);
        assert!(!usage.is_over_limit());
        usage.record(CredentialSource::Platform, 200);
        assert_eq!(usage.remaining_platform_tokens(), 0);
        assert!(usage.is_over_limit());
    }

    #[test]
    fn test_set_tier_keeps_counters() {
        let mut usage = SubscriptionUsage::new(Tier::Free);
        usage.record(CredentialSource::Platform, 1_000);
        usage.set_tier(Tier::Business);
        assert_eq!(usage.tokens_used, 1_000);
        assert_eq!(usage.token_limit, 200_000);
        assert_eq!(usage.workflow_limit, 99);
    }
}
