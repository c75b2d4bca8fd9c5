//! In-memory store and shared server state.
//!
//! Every mutation happens under one write lock, so a completion's quota
//! check, insert and counter bump are atomic.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::models::{Personality, Plan, Quest, QuestCompletion, Rival, SubscriptionStatus};
use crate::tier::TierLimits;

/// Wall clock with an adjustable day offset, so tests can cross midnight.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    offset_days: Arc<AtomicI64>,
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now() + Duration::days(self.offset_days.load(Ordering::SeqCst))
    }

    pub fn advance_days(&self, days: i64) {
        self.offset_days.fetch_add(days, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct QuestRecord {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub plan: Plan,
    pub status: String,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub reference: String,
    pub user_id: String,
    pub email: String,
    pub plan: Plan,
    pub amount_minor: u64,
    pub currency: String,
    pub status: String,
    pub transaction_id: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub webhook_received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_quest_id: i64,
    next_completion_id: i64,
    next_rival_id: i64,
    next_transaction_id: i64,
    quests: BTreeMap<i64, QuestRecord>,
    completions: Vec<QuestCompletion>,
    daily_counts: HashMap<(String, NaiveDate), u32>,
    rivals: Vec<Rival>,
    subscriptions: HashMap<String, Subscription>,
    payments: HashMap<String, Payment>,
}

impl Store {
    // --- quests ---

    pub fn insert_quest(&mut self, user_id: &str, title: &str, now: DateTime<Utc>) -> QuestRecord {
        self.next_quest_id += 1;
        let record = QuestRecord {
            id: self.next_quest_id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            created_at: now,
        };
        self.quests.insert(record.id, record.clone());
        record
    }

    pub fn quest(&self, user_id: &str, quest_id: i64) -> Option<&QuestRecord> {
        self.quests
            .get(&quest_id)
            .filter(|q| q.user_id == user_id)
    }

    /// Newest first.
    pub fn quests_for(&self, user_id: &str) -> Vec<&QuestRecord> {
        let mut quests: Vec<&QuestRecord> = self
            .quests
            .values()
            .filter(|q| q.user_id == user_id)
            .collect();
        quests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        quests
    }

    pub fn quest_count(&self, user_id: &str) -> u32 {
        self.quests.values().filter(|q| q.user_id == user_id).count() as u32
    }

    /// Removes the quest and its completions. The daily counter is left
    /// alone: a spent completion stays spent.
    pub fn delete_quest(&mut self, user_id: &str, quest_id: i64) -> bool {
        if self.quest(user_id, quest_id).is_none() {
            return false;
        }
        self.quests.remove(&quest_id);
        self.completions.retain(|c| c.quest_id != quest_id);
        true
    }

    pub fn completed_on(&self, quest_id: i64, date: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|c| c.quest_id == quest_id && c.date == date)
    }

    pub fn streak(&self, quest_id: i64, today: NaiveDate) -> u32 {
        let dates: BTreeSet<NaiveDate> = self
            .completions
            .iter()
            .filter(|c| c.quest_id == quest_id)
            .map(|c| c.date)
            .collect();
        streak_ending_near(&dates, today)
    }

    /// Quest view with today's completion flag and streak.
    pub fn quest_view(&self, record: &QuestRecord, today: NaiveDate) -> Quest {
        Quest {
            id: record.id,
            user_id: record.user_id.clone(),
            title: record.title.clone(),
            created_at: record.created_at,
            completed_today: self.completed_on(record.id, today),
            current_streak: self.streak(record.id, today),
        }
    }

    pub fn daily_used(&self, user_id: &str, date: NaiveDate) -> u32 {
        self.daily_counts
            .get(&(user_id.to_string(), date))
            .copied()
            .unwrap_or(0)
    }

    /// Insert today's completion and bump the user's daily counter.
    /// Returns the completion and the new counter value.
    pub fn record_completion(
        &mut self,
        user_id: &str,
        quest_id: i64,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> (QuestCompletion, u32) {
        self.next_completion_id += 1;
        let completion = QuestCompletion {
            id: self.next_completion_id,
            quest_id,
            date: today,
            created_at: now,
        };
        self.completions.push(completion.clone());

        let count = self
            .daily_counts
            .entry((user_id.to_string(), today))
            .or_insert(0);
        *count += 1;
        (completion, *count)
    }

    pub fn recent_quest_titles(&self, user_id: &str, limit: usize) -> Vec<String> {
        self.quests_for(user_id)
            .into_iter()
            .take(limit)
            .map(|q| q.title.clone())
            .collect()
    }

    // --- rivals ---

    /// Ordered by `rival_order`.
    pub fn rivals_for(&self, user_id: &str) -> Vec<&Rival> {
        let mut rivals: Vec<&Rival> = self.rivals.iter().filter(|r| r.user_id == user_id).collect();
        rivals.sort_by_key(|r| r.rival_order);
        rivals
    }

    pub fn active_rival(&self, user_id: &str) -> Option<&Rival> {
        self.rivals_for(user_id).into_iter().find(|r| r.is_active)
    }

    /// Append a rival in the next slot. The first rival is active.
    pub fn insert_rival(
        &mut self,
        user_id: &str,
        personality: Personality,
        persona: crate::persona::Persona,
        now: DateTime<Utc>,
    ) -> Rival {
        let existing = self.rivals_for(user_id).len() as u32;
        self.next_rival_id += 1;
        let rival = Rival {
            id: self.next_rival_id,
            user_id: user_id.to_string(),
            name: persona.name,
            archetype: persona.archetype,
            taunt: persona.taunt,
            personality_type: personality,
            level: 1,
            experience: 0,
            rival_order: existing + 1,
            is_active: existing == 0,
            created_at: now,
        };
        self.rivals.push(rival.clone());
        rival
    }

    // --- subscriptions & payments ---

    pub fn is_premium(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        self.subscriptions
            .get(user_id)
            .is_some_and(|s| s.status == "active" && s.end_date > now)
    }

    pub fn limits(&self, user_id: &str, now: DateTime<Utc>) -> TierLimits {
        TierLimits::for_premium(self.is_premium(user_id, now))
    }

    pub fn subscription_status(&self, user_id: &str, now: DateTime<Utc>) -> SubscriptionStatus {
        match self.subscriptions.get(user_id) {
            Some(sub) if sub.status == "active" && sub.end_date > now => SubscriptionStatus {
                is_premium: true,
                subscription_type: Some(sub.plan.as_str().to_string()),
                status: Some(sub.status.clone()),
                end_date: Some(sub.end_date),
                days_remaining: Some((sub.end_date - now).num_days().max(0)),
            },
            _ => SubscriptionStatus {
                is_premium: false,
                subscription_type: None,
                status: None,
                end_date: None,
                days_remaining: None,
            },
        }
    }

    /// Start (or restart) a subscription from `now`.
    pub fn activate_subscription(
        &mut self,
        user_id: &str,
        plan: Plan,
        duration_days: i64,
        now: DateTime<Utc>,
    ) {
        self.subscriptions.insert(
            user_id.to_string(),
            Subscription {
                plan,
                status: "active".to_string(),
                end_date: now + Duration::days(duration_days),
            },
        );
    }

    pub fn insert_payment(&mut self, payment: Payment) {
        self.payments.insert(payment.reference.clone(), payment);
    }

    pub fn payment(&self, reference: &str) -> Option<&Payment> {
        self.payments.get(reference)
    }

    pub fn has_payment(&self, reference: &str) -> bool {
        self.payments.contains_key(reference)
    }

    /// Mark a payment as settled by the gateway and return a copy.
    pub fn settle_payment(&mut self, reference: &str, now: DateTime<Utc>) -> Option<Payment> {
        let payment = self.payments.get_mut(reference)?;
        if payment.transaction_id.is_none() {
            self.next_transaction_id += 1;
            payment.transaction_id = Some(self.next_transaction_id);
        }
        payment.status = "success".to_string();
        payment.verified_at = Some(now);
        Some(payment.clone())
    }

    pub fn mark_webhook_received(&mut self, reference: &str, now: DateTime<Utc>) -> bool {
        match self.payments.get_mut(reference) {
            Some(payment) => {
                payment.webhook_received_at = Some(now);
                true
            }
            None => false,
        }
    }
}

/// Length of the consecutive-day run ending at the latest completion.
/// A run whose last day is before yesterday is broken.
pub fn streak_ending_near(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(&latest) = dates.iter().next_back() else {
        return 0;
    };
    if latest < today - Duration::days(1) {
        return 0;
    }

    let mut streak = 0;
    let mut expected = latest;
    for &date in dates.iter().rev() {
        if date != expected {
            break;
        }
        streak += 1;
        expected = date - Duration::days(1);
    }
    streak
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Store>>,
    pub clock: Clock,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            db: Arc::new(RwLock::new(Store::default())),
            clock: Clock::default(),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn streak_counts_run_ending_today() {
        let dates: BTreeSet<_> = [day(1), day(3), day(4), day(5)].into_iter().collect();
        assert_eq!(streak_ending_near(&dates, day(5)), 3);
    }

    #[test]
    fn streak_survives_until_end_of_next_day() {
        let dates: BTreeSet<_> = [day(4), day(5)].into_iter().collect();
        assert_eq!(streak_ending_near(&dates, day(6)), 2);
        assert_eq!(streak_ending_near(&dates, day(7)), 0);
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(streak_ending_near(&BTreeSet::new(), day(1)), 0);
    }

    #[test]
    fn record_completion_bumps_daily_counter() {
        let mut store = Store::default();
        let now = Utc::now();
        let a = store.insert_quest("u1", "Read", now);
        let b = store.insert_quest("u1", "Run", now);
        let today = now.date_naive();

        let (_, first) = store.record_completion("u1", a.id, today, now);
        let (_, second) = store.record_completion("u1", b.id, today, now);
        assert_eq!((first, second), (1, 2));
        assert_eq!(store.daily_used("u1", today), 2);
        assert_eq!(store.daily_used("u2", today), 0);
        assert!(store.completed_on(a.id, today));
    }

    #[test]
    fn quests_are_scoped_to_their_owner() {
        let mut store = Store::default();
        let now = Utc::now();
        let quest = store.insert_quest("u1", "Read", now);
        assert!(store.quest("u2", quest.id).is_none());
        assert!(!store.delete_quest("u2", quest.id));
        assert!(store.delete_quest("u1", quest.id));
        assert_eq!(store.quest_count("u1"), 0);
    }

    #[test]
    fn first_rival_is_active_and_later_ones_are_not() {
        let mut store = Store::default();
        let now = Utc::now();
        let persona = || crate::persona::Persona {
            name: "Blaze".to_string(),
            archetype: "Berserker".to_string(),
            taunt: "Catch me".to_string(),
        };
        let first = store.insert_rival("u1", Personality::Competitive, persona(), now);
        let second = store.insert_rival("u1", Personality::Warrior, persona(), now);
        assert!(first.is_active);
        assert!(!second.is_active);
        assert_eq!(second.rival_order, 2);
        assert_eq!(store.active_rival("u1").map(|r| r.id), Some(first.id));
    }

    #[test]
    fn subscription_expires_with_end_date() {
        let mut store = Store::default();
        let now = Utc::now();
        store.activate_subscription("u1", Plan::Monthly, 30, now);
        assert!(store.is_premium("u1", now));
        let status = store.subscription_status("u1", now);
        assert_eq!(status.days_remaining, Some(30));
        assert!(!store.is_premium("u1", now + Duration::days(31)));
    }
}
