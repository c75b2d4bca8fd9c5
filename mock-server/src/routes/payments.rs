use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha512;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::models::{InitializePaymentResponse, QuotaStatus, SubscriptionStatus, VerifyPaymentResponse};
use crate::state::{AppState, Payment};
use crate::tier::{plan_terms, UNLIMITED_QUESTS};
use crate::validate;

pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

type HmacSha512 = Hmac<Sha512>;

pub async fn initialize_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InitializePaymentResponse>, ApiFailure> {
    let init = validate::initialize_payment(&validate::json_body(body)?)?;
    let terms = plan_terms(init.plan);
    let now = state.clock.now();

    let mut db = state.db.write().await;
    let mut reference = format!("rq_{user}_{}_{}", init.plan.as_str(), now.timestamp());
    let mut attempt = 1;
    while db.has_payment(&reference) {
        attempt += 1;
        reference = format!("rq_{user}_{}_{}_{attempt}", init.plan.as_str(), now.timestamp());
    }

    let access_code = Uuid::new_v4().simple().to_string();
    db.insert_payment(Payment {
        reference: reference.clone(),
        user_id: user.clone(),
        email: init.email,
        plan: init.plan,
        amount_minor: terms.amount_minor,
        currency: terms.currency.to_string(),
        status: "pending".to_string(),
        transaction_id: None,
        verified_at: None,
        webhook_received_at: None,
    });
    info!(
        user = %user,
        reference = %reference,
        plan = init.plan.as_str(),
        amount = terms.amount_minor,
        callback = init.callback_url.as_deref().unwrap_or("-"),
        "payment initialized"
    );

    Ok(Json(InitializePaymentResponse {
        authorization_url: format!(
            "{}/{access_code}",
            state.config.checkout_base_url.trim_end_matches('/')
        ),
        access_code,
        reference,
        message: "Payment initialized successfully. Redirecting to Paystack...".to_string(),
    }))
}

/// The simulated gateway settles every known reference successfully.
pub async fn verify_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(raw_reference): Path<String>,
) -> Result<Json<VerifyPaymentResponse>, ApiFailure> {
    let reference = validate::reference_path(&raw_reference)?;
    let now = state.clock.now();

    let mut db = state.db.write().await;
    let owned = db.payment(reference).is_some_and(|p| p.user_id == user);
    if !owned {
        return Err(ApiFailure::NotFound("Payment verification failed".to_string()));
    }
    let payment = db
        .settle_payment(reference, now)
        .ok_or_else(|| ApiFailure::NotFound("Payment verification failed".to_string()))?;

    let terms = plan_terms(payment.plan);
    db.activate_subscription(&user, payment.plan, terms.duration_days, now);
    let subscription_status = db.subscription_status(&user, now);
    info!(user = %user, reference = %reference, plan = payment.plan.as_str(), "payment verified");

    let transaction_data = json!({
        "id": payment.transaction_id,
        "reference": payment.reference,
        "status": payment.status,
        "amount": payment.amount_minor,
        "currency": payment.currency,
        "customer": { "email": payment.email },
        "paid_at": payment.verified_at,
        "webhook_received_at": payment.webhook_received_at,
        "metadata": { "user_id": user, "plan": payment.plan.as_str() },
    });

    Ok(Json(VerifyPaymentResponse {
        message: format!("Payment {}", payment.status),
        status: payment.status,
        transaction_data,
        subscription_status: Some(subscription_status),
    }))
}

pub async fn get_subscription_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<SubscriptionStatus> {
    let now = state.clock.now();
    let db = state.db.read().await;
    Json(db.subscription_status(&user, now))
}

/// Quest creation is unlimited on every tier.
pub async fn get_quota_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<QuotaStatus> {
    let now = state.clock.now();
    let db = state.db.read().await;
    Json(QuotaStatus {
        current_quest_count: db.quest_count(&user),
        max_quests: UNLIMITED_QUESTS,
        is_premium: db.is_premium(&user, now),
        can_create_quest: true,
    })
}

pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiFailure> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let verified = state
        .config
        .paystack_secret_key
        .as_deref()
        .is_some_and(|secret| verify_signature(secret, &body, signature));
    if !verified {
        warn!("webhook rejected: invalid signature");
        return Err(ApiFailure::BadRequest("Invalid signature".to_string()));
    }

    let event: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiFailure::BadRequest("Webhook processing failed".to_string()))?;
    let event_type = event.get("event").and_then(Value::as_str).unwrap_or_default();
    info!(event = event_type, "webhook received");

    if event_type == "charge.success" {
        let reference = event
            .pointer("/data/reference")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiFailure::BadRequest("Webhook processing failed".to_string()))?;
        let now = state.clock.now();
        if state.db.write().await.mark_webhook_received(reference, now) {
            info!(reference = %reference, "payment webhook processed");
        } else {
            warn!(reference = %reference, "webhook for unknown payment");
        }
    }

    Ok(Json(json!({ "status": "success" })))
}

/// Hex HMAC-SHA512 of `payload` under `secret`, as the gateway signs it.
pub fn sign(secret: &str, payload: &[u8]) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let payload = br#"{"event":"charge.success"}"#;
        let signature = sign("sk_test", payload).unwrap();
        assert_eq!(signature.len(), 128);
        assert!(verify_signature("sk_test", payload, &signature));
        assert!(!verify_signature("sk_other", payload, &signature));
        assert!(!verify_signature("sk_test", b"{}", &signature));
        assert!(!verify_signature("sk_test", payload, "zz"));
    }
}
