//! Descriptor table for every API operation.
//!
//! Each operation is a flat record of method, path template and whether it
//! carries a JSON body. `RivalQuestClient::build` consumes these records, so
//! request building lives in one place.

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::ValidationIssue;

/// Every operation the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckHealth,
    InitializePayment,
    VerifyPayment,
    GetSubscriptionStatus,
    GetQuotaStatus,
    PaystackWebhook,
    CreateQuest,
    ListQuests,
    CompleteToday,
    DeleteQuest,
    GetRival,
    ListRivals,
    GenerateRival,
}

/// Static description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path_template: &'static str,
    pub has_body: bool,
    /// Whether the bearer token is attached.
    pub authenticated: bool,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::CheckHealth,
        Operation::InitializePayment,
        Operation::VerifyPayment,
        Operation::GetSubscriptionStatus,
        Operation::GetQuotaStatus,
        Operation::PaystackWebhook,
        Operation::CreateQuest,
        Operation::ListQuests,
        Operation::CompleteToday,
        Operation::DeleteQuest,
        Operation::GetRival,
        Operation::ListRivals,
        Operation::GenerateRival,
    ];

    pub const fn descriptor(&self) -> OperationDescriptor {
        use HttpMethod::*;

        let (name, method, path_template, has_body) = match self {
            Operation::CheckHealth => ("check_health", Get, "/_healthz", false),
            Operation::InitializePayment => {
                ("initialize_payment", Post, "/routes/payments/initialize", true)
            }
            Operation::VerifyPayment => {
                ("verify_payment", Get, "/routes/payments/verify/{reference}", false)
            }
            Operation::GetSubscriptionStatus => (
                "get_subscription_status",
                Get,
                "/routes/payments/subscription-status",
                false,
            ),
            Operation::GetQuotaStatus => {
                ("get_quota_status", Get, "/routes/payments/quota-status", false)
            }
            Operation::PaystackWebhook => {
                ("paystack_webhook", Post, "/routes/payments/webhook", true)
            }
            Operation::CreateQuest => ("create_quest", Post, "/routes/quests/create", true),
            Operation::ListQuests => ("list_quests", Get, "/routes/quests/list", false),
            Operation::CompleteToday => {
                ("complete_today", Post, "/routes/quests/complete-today", true)
            }
            Operation::DeleteQuest => {
                ("delete_quest", Delete, "/routes/quests/delete/{quest_id}", false)
            }
            Operation::GetRival => ("get_rival", Get, "/routes/rivals/get", false),
            Operation::ListRivals => ("list_rivals", Get, "/routes/rivals/list", false),
            Operation::GenerateRival => ("generate_rival", Post, "/routes/rivals/generate", false),
        };

        let authenticated = !matches!(self, Operation::CheckHealth | Operation::PaystackWebhook);

        OperationDescriptor {
            name,
            method,
            path_template,
            has_body,
            authenticated,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

impl OperationDescriptor {
    /// Substitute `{name}` placeholders from `params`.
    ///
    /// A placeholder without a matching parameter is a validation error on
    /// `["path", name]`.
    pub fn render_path(&self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let mut rendered = String::with_capacity(self.path_template.len());
        let mut rest = self.path_template;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            let key = &rest[open + 1..close];
            let value = params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    ApiError::Validation(vec![ValidationIssue::new(
                        &["path", key],
                        "Field required",
                        "missing",
                    )])
                })?;
            rendered.push_str(&rest[..open]);
            rendered.push_str(value);
            rest = &rest[close + 1..];
        }
        rendered.push_str(rest);
        Ok(rendered)
    }
}
