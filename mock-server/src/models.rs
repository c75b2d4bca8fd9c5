//! Wire types served by the mock backend.
//!
//! Defined independently from `rivalquest-core` so the client's live tests
//! catch schema drift.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Competitive,
    Encouraging,
    Mystical,
    Warrior,
    Trickster,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Competitive,
        Personality::Encouraging,
        Personality::Mystical,
        Personality::Warrior,
        Personality::Trickster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Competitive => "competitive",
            Personality::Encouraging => "encouraging",
            Personality::Mystical => "mystical",
            Personality::Warrior => "warrior",
            Personality::Trickster => "trickster",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL.into_iter().find(|p| p.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Annual,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Annual => "annual",
        }
    }
}

impl FromStr for Plan {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Plan::Monthly),
            "annual" => Ok(Plan::Annual),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quest {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub completed_today: bool,
    pub current_streak: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestCompletion {
    pub id: i64,
    pub quest_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rival {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub archetype: String,
    pub taunt: String,
    pub personality_type: Personality,
    pub level: u32,
    pub experience: u32,
    pub rival_order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestResponse {
    pub quest: Quest,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuestsResponse {
    pub quests: Vec<Quest>,
    pub total_count: u32,
    pub daily_completions_used: u32,
    pub daily_completions_limit: i64,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteQuestResponse {
    pub completion: QuestCompletion,
    pub quest: Quest,
    pub message: String,
    pub daily_completions_used: u32,
    pub daily_completions_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRivalResponse {
    pub rival: Option<Rival>,
    pub has_rival: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRivalsResponse {
    pub rivals: Vec<Rival>,
    pub total_count: u32,
    pub active_rival: Option<Rival>,
    pub slots_used: u32,
    pub max_slots: u32,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRivalResponse {
    pub rival: Rival,
    pub message: String,
    pub is_new: bool,
    pub slots_used: u32,
    pub max_slots: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub message: String,
    pub transaction_data: serde_json::Value,
    pub subscription_status: Option<SubscriptionStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionStatus {
    pub is_premium: bool,
    pub subscription_type: Option<String>,
    pub status: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub current_quest_count: u32,
    pub max_quests: u32,
    pub is_premium: bool,
    pub can_create_quest: bool,
}

/// One entry of a 422 `detail` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| (*s).to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}
