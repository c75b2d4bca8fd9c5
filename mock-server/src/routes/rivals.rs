use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::models::{GenerateRivalResponse, GetRivalResponse, ListRivalsResponse, Rival};
use crate::persona;
use crate::state::AppState;
use crate::validate;

/// Quest titles fed into persona generation.
const QUEST_CONTEXT_SIZE: usize = 5;

pub async fn get_rival(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<GetRivalResponse> {
    let db = state.db.read().await;
    let rival = db.active_rival(&user).cloned();

    Json(GetRivalResponse {
        has_rival: rival.is_some(),
        rival,
    })
}

pub async fn list_rivals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<ListRivalsResponse> {
    let now = state.clock.now();
    let db = state.db.read().await;

    let rivals: Vec<Rival> = db.rivals_for(&user).into_iter().cloned().collect();
    let active_rival = rivals.iter().find(|r| r.is_active).cloned();
    let count = rivals.len() as u32;

    Json(ListRivalsResponse {
        rivals,
        total_count: count,
        active_rival,
        slots_used: count,
        max_slots: db.limits(&user, now).max_rival_slots,
        is_premium: db.is_premium(&user, now),
    })
}

pub async fn generate_rival(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<GenerateRivalResponse>, ApiFailure> {
    let personality =
        validate::personality_query(params.get("personality_type").map(String::as_str))?;
    let now = state.clock.now();

    let mut db = state.db.write().await;
    let max_slots = db.limits(&user, now).max_rival_slots;
    let existing = db.rivals_for(&user).len() as u32;

    if existing >= max_slots {
        warn!(user = %user, max_slots, "rival slot limit reached");
        return Err(ApiFailure::QuotaExceeded(format!(
            "Rival limit reached ({max_slots}). Upgrade to Champion for multiple rivals!"
        )));
    }

    let context = db.recent_quest_titles(&user, QUEST_CONTEXT_SIZE);
    let persona = persona::generate(personality, &context, &mut rand::thread_rng());
    let rival = db.insert_rival(&user, personality, persona, now);
    info!(user = %user, rival_id = rival.id, personality = %personality, "rival generated");

    let status = if rival.is_active {
        "active"
    } else {
        "ready to challenge"
    };
    let message = format!(
        "Meet your new {personality} rival: {} the {}! They're {status}.",
        rival.name, rival.archetype
    );

    Ok(Json(GenerateRivalResponse {
        rival,
        message,
        is_new: true,
        slots_used: existing + 1,
        max_slots,
    }))
}
