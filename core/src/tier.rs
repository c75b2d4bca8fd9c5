//! Subscription tier ceilings and the plan price catalog.
//!
//! Tier logic lives here so the UI can decide whether an action is still
//! within budget without scattering `is_premium` checks. The server stays
//! authoritative: these helpers only decide whether to offer an upgrade
//! before issuing a call that would be rejected anyway.

use crate::types::{ListQuestsResponse, ListRivalsResponse, Plan, QuotaStatus};

/// Wire value for "no daily ceiling".
pub const UNLIMITED: i64 = -1;

/// Quest ceiling reported by the quota endpoint. Quest creation itself is
/// never limited.
pub const UNLIMITED_QUESTS: u32 = 999;

/// Ceilings for one subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    /// `None` means unlimited.
    pub max_daily_completions: Option<u32>,
    pub max_rival_slots: u32,
}

impl TierLimits {
    pub const FREE: TierLimits = TierLimits {
        max_daily_completions: Some(5),
        max_rival_slots: 1,
    };

    pub const PREMIUM: TierLimits = TierLimits {
        max_daily_completions: None,
        max_rival_slots: 5,
    };

    pub fn for_premium(is_premium: bool) -> Self {
        if is_premium {
            Self::PREMIUM
        } else {
            Self::FREE
        }
    }

    pub fn can_complete(&self, used_today: u32) -> bool {
        self.max_daily_completions.map_or(true, |max| used_today < max)
    }

    pub fn can_add_rival(&self, slots_used: u32) -> bool {
        slots_used < self.max_rival_slots
    }

    /// Completions left today; `None` when unlimited.
    pub fn remaining_completions(&self, used_today: u32) -> Option<u32> {
        self.max_daily_completions.map(|max| max.saturating_sub(used_today))
    }

    /// Daily ceiling as sent on the wire.
    pub fn daily_limit_wire(&self) -> i64 {
        self.max_daily_completions.map_or(UNLIMITED, i64::from)
    }
}

/// Convert a wire daily limit (`-1` or any negative = unlimited).
pub fn daily_limit_from_wire(limit: i64) -> Option<u32> {
    if limit < 0 {
        None
    } else {
        Some(u32::try_from(limit).unwrap_or(u32::MAX))
    }
}

/// Price and duration of a subscription plan. Amounts are integer minor
/// units of `currency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPricing {
    pub amount_minor: u64,
    pub currency: &'static str,
    pub duration_days: i64,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Monthly, Plan::Annual];

    /// The single source of truth for plan prices.
    pub fn pricing(&self) -> PlanPricing {
        match self {
            Plan::Monthly => PlanPricing {
                amount_minor: 299,
                currency: "NGN",
                duration_days: 30,
            },
            Plan::Annual => PlanPricing {
                amount_minor: 2499,
                currency: "NGN",
                duration_days: 365,
            },
        }
    }
}

impl ListQuestsResponse {
    /// Daily budget as reported by the server, not re-derived from the tier.
    pub fn limits(&self) -> TierLimits {
        TierLimits {
            max_daily_completions: daily_limit_from_wire(self.daily_completions_limit),
            ..TierLimits::for_premium(self.is_premium)
        }
    }

    pub fn can_complete_more(&self) -> bool {
        self.is_premium || self.limits().can_complete(self.daily_completions_used)
    }
}

impl ListRivalsResponse {
    pub fn can_generate_more(&self) -> bool {
        self.slots_used < self.max_slots
    }
}

impl QuotaStatus {
    /// `max_quests` at or above the sentinel means no quest ceiling.
    pub fn has_quest_ceiling(&self) -> bool {
        self.max_quests < UNLIMITED_QUESTS
    }

    /// Quests still creatable, `None` when there is no ceiling.
    pub fn remaining_quests(&self) -> Option<u32> {
        self.has_quest_ceiling()
            .then(|| self.max_quests.saturating_sub(self.current_quest_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_caps_completions_at_five() {
        let free = TierLimits::FREE;
        assert!(free.can_complete(4));
        assert!(!free.can_complete(5));
        assert_eq!(free.remaining_completions(3), Some(2));
        assert_eq!(free.remaining_completions(7), Some(0));
        assert_eq!(free.daily_limit_wire(), 5);
    }

    #[test]
    fn premium_tier_is_unlimited_with_five_slots() {
        let premium = TierLimits::for_premium(true);
        assert!(premium.can_complete(10_000));
        assert_eq!(premium.remaining_completions(10), None);
        assert_eq!(premium.daily_limit_wire(), UNLIMITED);
        assert!(premium.can_add_rival(4));
        assert!(!premium.can_add_rival(5));
    }

    #[test]
    fn free_tier_has_one_rival_slot() {
        assert!(TierLimits::FREE.can_add_rival(0));
        assert!(!TierLimits::FREE.can_add_rival(1));
    }

    #[test]
    fn wire_limit_conversion() {
        assert_eq!(daily_limit_from_wire(-1), None);
        assert_eq!(daily_limit_from_wire(5), Some(5));
    }

    #[test]
    fn plan_prices_come_from_the_catalog() {
        assert_eq!(Plan::Monthly.pricing().amount_minor, 299);
        assert_eq!(Plan::Annual.pricing().amount_minor, 2499);
        assert_eq!(Plan::Annual.pricing().duration_days, 365);
    }

    #[test]
    fn list_quests_budget_uses_server_numbers() {
        let list = ListQuestsResponse {
            quests: Vec::new(),
            total_count: 0,
            daily_completions_used: 5,
            daily_completions_limit: 5,
            is_premium: false,
        };
        assert!(!list.can_complete_more());
        assert_eq!(list.limits().max_rival_slots, 1);
    }

    #[test]
    fn quota_sentinel_means_no_quest_ceiling() {
        let mut quota = QuotaStatus {
            current_quest_count: 12,
            max_quests: UNLIMITED_QUESTS,
            is_premium: false,
            can_create_quest: true,
        };
        assert!(!quota.has_quest_ceiling());
        assert_eq!(quota.remaining_quests(), None);

        quota.max_quests = 20;
        assert!(quota.has_quest_ceiling());
        assert_eq!(quota.remaining_quests(), Some(8));
    }
}
