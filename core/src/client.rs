//! Stateless HTTP request builder and response parser for the RivalQuest API.
//!
//! # Design
//! `RivalQuestClient` holds only a base URL and an optional bearer token and
//! carries no mutable state between calls. Every operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Both halves go through one generic pair,
//! `build` and `parse`, driven by the `Operation` descriptor table; the typed
//! methods only encode arguments and pick the result type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::types::{
    CompleteQuestRequest, CompleteQuestResponse, CreateQuestRequest, CreateQuestResponse,
    GenerateRivalResponse, GetRivalResponse, HealthResponse, HttpValidationError,
    InitializePaymentRequest, InitializePaymentResponse, ListQuestsResponse, ListRivalsResponse,
    PersonalityType, QuotaStatus, SubscriptionStatus, ValidationIssue, VerifyPaymentResponse,
};

/// Header carrying the gateway's webhook signature.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Synchronous, stateless client for the RivalQuest API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `ApiClient` for a client that also performs
/// the round trip.
#[derive(Debug, Clone)]
pub struct RivalQuestClient {
    base_url: String,
    auth_token: Option<String>,
}

impl RivalQuestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url);
        match &config.auth_token {
            Some(token) => client.with_auth_token(token),
            None => client,
        }
    }

    /// Attach a bearer token to every authenticated route.
    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic dispatch
    // -----------------------------------------------------------------------

    /// Build the request for `op` from path parameters, query pairs and an
    /// already-encoded JSON body.
    pub fn build(
        &self,
        op: Operation,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let path = op.descriptor().render_path(params)?;
        Ok(self.assemble(op, &path, query, body))
    }

    fn assemble(
        &self,
        op: Operation,
        route: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> HttpRequest {
        let descriptor = op.descriptor();
        let mut path = format!("{}{route}", self.base_url);

        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }

        let mut headers = Vec::new();
        if descriptor.authenticated {
            if let Some(token) = &self.auth_token {
                headers.push(("authorization".to_string(), format!("Bearer {token}")));
            }
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        debug!(
            operation = descriptor.name,
            method = descriptor.method.as_str(),
            path = %path,
            "built request"
        );

        HttpRequest {
            method: descriptor.method,
            path,
            headers,
            body,
        }
    }

    /// Check the status of `response` and decode its body as `T`.
    pub fn parse<T: DeserializeOwned>(
        &self,
        op: Operation,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        debug!(operation = op.name(), status = response.status, "parsing response");
        check_status(op, &response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Build request methods
    // -----------------------------------------------------------------------

    pub fn build_check_health(&self) -> HttpRequest {
        self.build_without_input(Operation::CheckHealth)
    }

    pub fn build_initialize_payment(
        &self,
        input: &InitializePaymentRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build(Operation::InitializePayment, &[], &[], Some(to_json(input)?))
    }

    /// Fails with a validation error on `["path", "reference"]` if the
    /// reference cannot travel as a single path segment.
    pub fn build_verify_payment(&self, reference: &str) -> Result<HttpRequest, ApiError> {
        validate_reference(reference)?;
        let segment = urlencoding::encode(reference);
        self.build(Operation::VerifyPayment, &[("reference", segment.as_ref())], &[], None)
    }

    pub fn build_get_subscription_status(&self) -> HttpRequest {
        self.build_without_input(Operation::GetSubscriptionStatus)
    }

    pub fn build_get_quota_status(&self) -> HttpRequest {
        self.build_without_input(Operation::GetQuotaStatus)
    }

    /// Forward a provider event. The payload is sent byte for byte so the
    /// signature stays valid.
    pub fn build_paystack_webhook(&self, payload: &str, signature: Option<&str>) -> HttpRequest {
        let op = Operation::PaystackWebhook;
        let mut request = self.assemble(
            op,
            op.descriptor().path_template,
            &[],
            Some(payload.to_string()),
        );
        if let Some(signature) = signature {
            request
                .headers
                .push((SIGNATURE_HEADER.to_string(), signature.to_string()));
        }
        request
    }

    pub fn build_create_quest(&self, input: &CreateQuestRequest) -> Result<HttpRequest, ApiError> {
        self.build(Operation::CreateQuest, &[], &[], Some(to_json(input)?))
    }

    pub fn build_list_quests(&self) -> HttpRequest {
        self.build_without_input(Operation::ListQuests)
    }

    pub fn build_complete_today(
        &self,
        input: &CompleteQuestRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build(Operation::CompleteToday, &[], &[], Some(to_json(input)?))
    }

    pub fn build_delete_quest(&self, quest_id: i64) -> Result<HttpRequest, ApiError> {
        let id = quest_id.to_string();
        self.build(Operation::DeleteQuest, &[("quest_id", &id)], &[], None)
    }

    pub fn build_get_rival(&self) -> HttpRequest {
        self.build_without_input(Operation::GetRival)
    }

    pub fn build_list_rivals(&self) -> HttpRequest {
        self.build_without_input(Operation::ListRivals)
    }

    /// `None` sends the default personality, `competitive`.
    pub fn build_generate_rival(&self, personality: Option<PersonalityType>) -> HttpRequest {
        let op = Operation::GenerateRival;
        let personality = personality.unwrap_or_default();
        self.assemble(
            op,
            op.descriptor().path_template,
            &[("personality_type", personality.as_str())],
            None,
        )
    }

    /// Operations whose path has no placeholders.
    fn build_without_input(&self, op: Operation) -> HttpRequest {
        self.assemble(op, op.descriptor().path_template, &[], None)
    }

    // -----------------------------------------------------------------------
    // Parse response methods
    // -----------------------------------------------------------------------

    pub fn parse_check_health(&self, response: HttpResponse) -> Result<HealthResponse, ApiError> {
        self.parse(Operation::CheckHealth, response)
    }

    pub fn parse_initialize_payment(
        &self,
        response: HttpResponse,
    ) -> Result<InitializePaymentResponse, ApiError> {
        self.parse(Operation::InitializePayment, response)
    }

    pub fn parse_verify_payment(
        &self,
        response: HttpResponse,
    ) -> Result<VerifyPaymentResponse, ApiError> {
        self.parse(Operation::VerifyPayment, response)
    }

    pub fn parse_get_subscription_status(
        &self,
        response: HttpResponse,
    ) -> Result<SubscriptionStatus, ApiError> {
        self.parse(Operation::GetSubscriptionStatus, response)
    }

    pub fn parse_get_quota_status(&self, response: HttpResponse) -> Result<QuotaStatus, ApiError> {
        self.parse(Operation::GetQuotaStatus, response)
    }

    pub fn parse_paystack_webhook(
        &self,
        response: HttpResponse,
    ) -> Result<serde_json::Value, ApiError> {
        self.parse(Operation::PaystackWebhook, response)
    }

    pub fn parse_create_quest(
        &self,
        response: HttpResponse,
    ) -> Result<CreateQuestResponse, ApiError> {
        self.parse(Operation::CreateQuest, response)
    }

    pub fn parse_list_quests(&self, response: HttpResponse) -> Result<ListQuestsResponse, ApiError> {
        self.parse(Operation::ListQuests, response)
    }

    pub fn parse_complete_today(
        &self,
        response: HttpResponse,
    ) -> Result<CompleteQuestResponse, ApiError> {
        self.parse(Operation::CompleteToday, response)
    }

    pub fn parse_delete_quest(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        self.parse(Operation::DeleteQuest, response)
    }

    pub fn parse_get_rival(&self, response: HttpResponse) -> Result<GetRivalResponse, ApiError> {
        self.parse(Operation::GetRival, response)
    }

    pub fn parse_list_rivals(&self, response: HttpResponse) -> Result<ListRivalsResponse, ApiError> {
        self.parse(Operation::ListRivals, response)
    }

    pub fn parse_generate_rival(
        &self,
        response: HttpResponse,
    ) -> Result<GenerateRivalResponse, ApiError> {
        self.parse(Operation::GenerateRival, response)
    }
}

fn to_json<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Payment references travel percent-encoded as one path segment, so only
/// an empty reference or one containing `/` is refused.
fn validate_reference(reference: &str) -> Result<(), ApiError> {
    if !reference.is_empty() && !reference.contains('/') {
        return Ok(());
    }
    Err(ApiError::Validation(vec![ValidationIssue::new(
        &["path", "reference"],
        "Reference must be a non-empty path segment without '/'",
        "string_pattern_mismatch",
    )]))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(op: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }

    let error = match response.status {
        401 => ApiError::Unauthorized,
        403 => ApiError::QuotaExceeded {
            reason: detail_message(&response.body),
        },
        404 => ApiError::NotFound {
            reason: detail_message(&response.body),
        },
        409 if op == Operation::CompleteToday => ApiError::AlreadyCompleted {
            reason: detail_message(&response.body),
        },
        400 => legacy_bad_request(op, response),
        422 => match serde_json::from_str::<HttpValidationError>(&response.body) {
            Ok(body) if !body.detail.is_empty() => ApiError::Validation(body.detail),
            _ => ApiError::HttpError {
                status: response.status,
                body: response.body.clone(),
            },
        },
        status => ApiError::HttpError {
            status,
            body: response.body.clone(),
        },
    };

    debug!(operation = op.name(), status = response.status, error = %error, "request rejected");
    Err(error)
}

/// Older backends answer a repeated completion and some field errors with a
/// plain 400 and a string `detail`. Route those into the channel a 409 or
/// 422 would have used; any other 400 stays an `HttpError`.
fn legacy_bad_request(op: Operation, response: &HttpResponse) -> ApiError {
    let detail = detail_message(&response.body);
    let lowered = detail.to_ascii_lowercase();

    let loc: Option<&[&str]> = match op {
        Operation::CompleteToday if lowered.contains("already completed") => {
            return ApiError::AlreadyCompleted { reason: detail };
        }
        Operation::CreateQuest => Some(&["body", "title"][..]),
        Operation::GenerateRival => Some(&["query", "personality_type"][..]),
        // Gateway failures share the status; only the plan check is a field error.
        Operation::InitializePayment if lowered.contains("plan") => Some(&["body", "plan"][..]),
        _ => None,
    };

    match loc {
        Some(loc) => ApiError::Validation(vec![ValidationIssue::new(loc, detail, "value_error")]),
        None => ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        },
    }
}

/// Extract `detail` from a `{"detail": "..."}` body, falling back to the raw
/// body.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
