//! Tier ceilings and plan catalog, looked up once per request.

use crate::models::Plan;

pub const UNLIMITED: i64 = -1;
pub const UNLIMITED_QUESTS: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
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

    pub fn daily_limit_wire(&self) -> i64 {
        self.max_daily_completions.map_or(UNLIMITED, i64::from)
    }

    /// Progress label such as `3/5` or `3/∞`.
    pub fn progress_label(&self, used: u32) -> String {
        match self.max_daily_completions {
            Some(max) => format!("{used}/{max}"),
            None => format!("{used}/∞"),
        }
    }
}

pub struct PlanTerms {
    pub amount_minor: u64,
    pub currency: &'static str,
    pub duration_days: i64,
}

pub fn plan_terms(plan: Plan) -> PlanTerms {
    match plan {
        Plan::Monthly => PlanTerms {
            amount_minor: 299,
            currency: "NGN",
            duration_days: 30,
        },
        Plan::Annual => PlanTerms {
            amount_minor: 2499,
            currency: "NGN",
            duration_days: 365,
        },
    }
}
