use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::models::{CompleteQuestResponse, CreateQuestResponse, ListQuestsResponse};
use crate::state::AppState;
use crate::validate;

pub async fn create_quest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateQuestResponse>, ApiFailure> {
    let title = validate::create_quest(&validate::json_body(body)?)?;
    let now = state.clock.now();

    let mut db = state.db.write().await;
    let record = db.insert_quest(&user, &title, now);
    let quest = db.quest_view(&record, now.date_naive());
    info!(user = %user, quest_id = quest.id, "quest created");

    Ok(Json(CreateQuestResponse {
        quest,
        message: "Quest created successfully! Time to build your streak.".to_string(),
    }))
}

pub async fn list_quests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<ListQuestsResponse> {
    let now = state.clock.now();
    let today = now.date_naive();
    let db = state.db.read().await;

    let limits = db.limits(&user, now);
    let quests: Vec<_> = db
        .quests_for(&user)
        .into_iter()
        .map(|record| db.quest_view(record, today))
        .collect();

    Json(ListQuestsResponse {
        total_count: quests.len() as u32,
        quests,
        daily_completions_used: db.daily_used(&user, today),
        daily_completions_limit: limits.daily_limit_wire(),
        is_premium: db.is_premium(&user, now),
    })
}

pub async fn complete_today(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CompleteQuestResponse>, ApiFailure> {
    let quest_id = validate::complete_quest(&validate::json_body(body)?)?;
    let now = state.clock.now();
    let today = now.date_naive();

    let mut db = state.db.write().await;
    let record = db
        .quest(&user, quest_id)
        .cloned()
        .ok_or_else(|| ApiFailure::NotFound("Quest not found".to_string()))?;

    if db.completed_on(quest_id, today) {
        warn!(user = %user, quest_id, "quest already completed today");
        return Err(ApiFailure::AlreadyCompleted(
            "Quest already completed today".to_string(),
        ));
    }

    let limits = db.limits(&user, now);
    if let Some(max) = limits.max_daily_completions {
        if db.daily_used(&user, today) >= max {
            warn!(user = %user, quest_id, limit = max, "daily completion limit reached");
            return Err(ApiFailure::QuotaExceeded(format!(
                "Daily completion limit reached ({max}/day). Upgrade to Champion for unlimited daily completions!"
            )));
        }
    }

    let (completion, used) = db.record_completion(&user, quest_id, today, now);
    let quest = db.quest_view(&record, today);
    info!(user = %user, quest_id, streak = quest.current_streak, used, "quest completed");

    let streak = quest.current_streak;
    let streak_msg = if streak > 0 {
        format!("Streak: {streak} day{}!", if streak == 1 { "" } else { "s" })
    } else {
        "Great start!".to_string()
    };
    let message = format!(
        "Quest completed! {streak_msg} Daily progress: {}",
        limits.progress_label(used)
    );

    Ok(Json(CompleteQuestResponse {
        completion,
        quest,
        message,
        daily_completions_used: used,
        daily_completions_limit: limits.daily_limit_wire(),
    }))
}

pub async fn delete_quest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let quest_id = validate::quest_id_path(&raw_id)?;

    let mut db = state.db.write().await;
    if !db.delete_quest(&user, quest_id) {
        return Err(ApiFailure::NotFound("Quest not found".to_string()));
    }
    info!(user = %user, quest_id, "quest deleted");

    Ok(Json(json!({ "message": "Quest deleted successfully" })))
}
