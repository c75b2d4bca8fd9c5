//! Request validation producing field-level `detail` lists.
//!
//! Bodies are checked field by field so a single 422 lists every offending
//! field, not just the first.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::ApiFailure;
use crate::models::{Personality, Plan, ValidationIssue};

/// Accept the raw JSON extraction result; malformed JSON becomes a 422.
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiFailure> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiFailure::Validation(vec![ValidationIssue::new(
            &["body"],
            rejection.body_text(),
            "json_invalid",
        )])
    })
}

/// Collects issues while reading fields from a JSON object body.
pub struct BodyCheck<'a> {
    fields: Option<&'a Map<String, Value>>,
    issues: Vec<ValidationIssue>,
}

impl<'a> BodyCheck<'a> {
    pub fn new(body: &'a Value) -> Self {
        let mut issues = Vec::new();
        let fields = body.as_object();
        if fields.is_none() {
            issues.push(ValidationIssue::new(
                &["body"],
                "Input should be a valid dictionary",
                "model_attributes_type",
            ));
        }
        Self { fields, issues }
    }

    fn field(&mut self, name: &str) -> Option<&'a Value> {
        let fields = self.fields?;
        match fields.get(name) {
            Some(value) => Some(value),
            None => {
                self.issues
                    .push(ValidationIssue::new(&["body", name], "Field required", "missing"));
                None
            }
        }
    }

    pub fn required_str(&mut self, name: &str) -> Option<&'a str> {
        let value = self.field(name)?;
        let text = value.as_str();
        if text.is_none() {
            self.issues.push(ValidationIssue::new(
                &["body", name],
                "Input should be a valid string",
                "string_type",
            ));
        }
        text
    }

    pub fn optional_str(&mut self, name: &str) -> Option<&'a str> {
        let value = self.fields?.get(name)?;
        if value.is_null() {
            return None;
        }
        let text = value.as_str();
        if text.is_none() {
            self.issues.push(ValidationIssue::new(
                &["body", name],
                "Input should be a valid string",
                "string_type",
            ));
        }
        text
    }

    pub fn required_int(&mut self, name: &str) -> Option<i64> {
        let value = self.field(name)?;
        let number = value.as_i64();
        if number.is_none() {
            self.issues.push(ValidationIssue::new(
                &["body", name],
                "Input should be a valid integer",
                "int_type",
            ));
        }
        number
    }

    pub fn reject(&mut self, name: &str, msg: &str, kind: &str) {
        self.issues.push(ValidationIssue::new(&["body", name], msg, kind));
    }

    pub fn finish(self) -> Result<(), ApiFailure> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ApiFailure::Validation(self.issues))
        }
    }
}

pub fn create_quest(body: &Value) -> Result<String, ApiFailure> {
    let mut check = BodyCheck::new(body);
    let title = check.required_str("title").map(str::trim);
    if title == Some("") {
        check.reject("title", "Quest title cannot be empty", "value_error");
    }
    check.finish()?;
    Ok(title.unwrap_or_default().to_string())
}

pub fn complete_quest(body: &Value) -> Result<i64, ApiFailure> {
    let mut check = BodyCheck::new(body);
    let quest_id = check.required_int("quest_id");
    check.finish()?;
    Ok(quest_id.unwrap_or_default())
}

#[derive(Debug)]
pub struct PaymentInit {
    pub email: String,
    pub plan: Plan,
    pub callback_url: Option<String>,
}

pub fn initialize_payment(body: &Value) -> Result<PaymentInit, ApiFailure> {
    let mut check = BodyCheck::new(body);

    let email = check.required_str("email");
    if let Some(email) = email {
        if !looks_like_email(email) {
            check.reject(
                "email",
                "value is not a valid email address",
                "value_error",
            );
        }
    }

    let plan = check.required_str("plan").and_then(|raw| {
        let plan = raw.parse::<Plan>().ok();
        if plan.is_none() {
            check.reject("plan", "Input should be 'monthly' or 'annual'", "literal_error");
        }
        plan
    });

    let callback_url = check.optional_str("callback_url");
    check.finish()?;

    match (email, plan) {
        (Some(email), Some(plan)) => Ok(PaymentInit {
            email: email.to_string(),
            plan,
            callback_url: callback_url.map(str::to_string),
        }),
        _ => Err(ApiFailure::BadRequest("Invalid payment request".to_string())),
    }
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn quest_id_path(raw: &str) -> Result<i64, ApiFailure> {
    raw.parse::<i64>().map_err(|_| {
        ApiFailure::Validation(vec![ValidationIssue::new(
            &["path", "quest_id"],
            "Input should be a valid integer, unable to parse string as an integer",
            "int_parsing",
        )])
    })
}

/// Decoded `{reference}` segment. References embed the raw user id, so any
/// character is allowed except `/`.
pub fn reference_path(raw: &str) -> Result<&str, ApiFailure> {
    if !raw.is_empty() && !raw.contains('/') {
        Ok(raw)
    } else {
        Err(ApiFailure::Validation(vec![ValidationIssue::new(
            &["path", "reference"],
            "String should match pattern '^[^/]+$'",
            "string_pattern_mismatch",
        )]))
    }
}

/// `personality_type` query parameter; absent means `competitive`.
pub fn personality_query(raw: Option<&str>) -> Result<Personality, ApiFailure> {
    match raw {
        None => Ok(Personality::Competitive),
        Some(value) => value.parse().map_err(|_| {
            let allowed: Vec<&str> = Personality::ALL.iter().map(|p| p.as_str()).collect();
            ApiFailure::Validation(vec![ValidationIssue::new(
                &["query", "personality_type"],
                format!("Input should be one of: {}", allowed.join(", ")),
                "enum",
            )])
        }),
    }
}
