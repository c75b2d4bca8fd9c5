//! Data contracts for the RivalQuest API.
//!
//! # Design
//! These types mirror the backend's JSON schema field for field but are
//! defined independently from the mock-server crate; the live integration
//! tests catch any schema drift between the two. Timestamps are
//! `DateTime<Utc>` (ISO-8601 date-time on the wire), completion dates are
//! `NaiveDate` (calendar date, no time component).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Rival personality archetype. Lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    #[default]
    Competitive,
    Encouraging,
    Mystical,
    Warrior,
    Trickster,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 5] = [
        PersonalityType::Competitive,
        PersonalityType::Encouraging,
        PersonalityType::Mystical,
        PersonalityType::Warrior,
        PersonalityType::Trickster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalityType::Competitive => "competitive",
            PersonalityType::Encouraging => "encouraging",
            PersonalityType::Mystical => "mystical",
            PersonalityType::Warrior => "warrior",
            PersonalityType::Trickster => "trickster",
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonalityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonalityType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown personality type: {s}"))
    }
}

/// Subscription plan identifier.
///
/// The backend enum is `"monthly" | "annual"`. Some UI copy says "yearly";
/// it is accepted on input and always sent as `"annual"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    #[serde(alias = "yearly")]
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

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A daily habit owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quest {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default)]
    pub current_streak: u32,
}

/// One completion of a quest on a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestCompletion {
    pub id: i64,
    pub quest_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// An AI-generated rival character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rival {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub archetype: String,
    pub taunt: String,
    pub personality_type: PersonalityType,
    pub level: u32,
    pub experience: u32,
    pub rival_order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializePaymentRequest {
    pub email: String,
    pub plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
    pub message: String,
}

/// Result of verifying a payment with the gateway. `transaction_data` is
/// the provider's payload, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub message: String,
    pub transaction_data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub subscription_status: Option<SubscriptionStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionStatus {
    pub is_premium: bool,
    #[serde(default)]
    pub subscription_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuotaStatus {
    pub current_quest_count: u32,
    pub max_quests: u32,
    pub is_premium: bool,
    pub can_create_quest: bool,
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateQuestResponse {
    pub quest: Quest,
    pub message: String,
}

/// All quests of the current user plus today's completion budget.
///
/// `daily_completions_limit` is `-1` when the tier has no daily ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuestsResponse {
    pub quests: Vec<Quest>,
    pub total_count: u32,
    pub daily_completions_used: u32,
    pub daily_completions_limit: i64,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteQuestRequest {
    pub quest_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteQuestResponse {
    pub completion: QuestCompletion,
    pub quest: Quest,
    pub message: String,
    pub daily_completions_used: u32,
    pub daily_completions_limit: i64,
}

// ---------------------------------------------------------------------------
// Rivals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetRivalResponse {
    pub rival: Option<Rival>,
    pub has_rival: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRivalsResponse {
    pub rivals: Vec<Rival>,
    pub total_count: u32,
    pub active_rival: Option<Rival>,
    pub slots_used: u32,
    pub max_slots: u32,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRivalResponse {
    pub rival: Rival,
    pub message: String,
    pub is_new: bool,
    pub slots_used: u32,
    pub max_slots: u32,
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// One segment of a validation error location: a field name or an index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(i64),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Field(name) => f.write_str(name),
            LocSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A single field-level violation from a 422 response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| LocSegment::Field((*s).to_string())).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Name of the offending field: the last named segment of `loc`.
    pub fn field(&self) -> Option<&str> {
        self.loc.iter().rev().find_map(|seg| match seg {
            LocSegment::Field(name) => Some(name.as_str()),
            LocSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc: Vec<String> = self.loc.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", loc.join("."), self.msg)
    }
}

/// Body of a 422 response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpValidationError {
    #[serde(default)]
    pub detail: Vec<ValidationIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_defaults_completion_fields() {
        let quest: Quest = serde_json::from_str(
            r#"{"id":1,"user_id":"u1","title":"Read","created_at":"2026-01-05T08:00:00Z"}"#,
        )
        .unwrap();
        assert!(!quest.completed_today);
        assert_eq!(quest.current_streak, 0);
    }

    #[test]
    fn plan_accepts_yearly_alias_but_sends_annual() {
        let plan: Plan = serde_json::from_str(r#""yearly""#).unwrap();
        assert_eq!(plan, Plan::Annual);
        assert_eq!(serde_json::to_string(&plan).unwrap(), r#""annual""#);
    }

    #[test]
    fn personality_type_parses_and_rejects() {
        assert_eq!("mystical".parse::<PersonalityType>().unwrap(), PersonalityType::Mystical);
        assert!("grumpy".parse::<PersonalityType>().is_err());
        assert_eq!(PersonalityType::default(), PersonalityType::Competitive);
    }

    #[test]
    fn validation_issue_reads_mixed_loc() {
        let body: HttpValidationError = serde_json::from_str(
            r#"{"detail":[{"loc":["body","tags",0],"msg":"bad","type":"value_error"}]}"#,
        )
        .unwrap();
        let issue = &body.detail[0];
        assert_eq!(issue.loc[2], LocSegment::Index(0));
        assert_eq!(issue.field(), Some("tags"));
        assert_eq!(issue.to_string(), "body.tags.0: bad");
    }

    #[test]
    fn completion_date_has_no_time_component() {
        let completion = QuestCompletion {
            id: 3,
            quest_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            created_at: "2026-03-14T09:30:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&completion).unwrap();
        assert_eq!(json["date"], "2026-03-14");
    }
}
