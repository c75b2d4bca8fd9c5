//! In-memory RivalQuest backend.
//!
//! Serves the same routes as the production API and enforces its rules:
//! one completion per quest per day, the daily completion ceiling, rival
//! slots, subscriptions bought through a simulated payment gateway. The
//! core client's live tests run against it.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod persona;
pub mod routes;
pub mod state;
pub mod tier;
pub mod validate;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use routes::payments::{sign as sign_webhook, SIGNATURE_HEADER};
pub use state::{AppState, Clock};

/// Router over fresh state with default configuration.
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Router over caller-provided state, so tests can keep a handle on the
/// clock and store.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/_healthz", get(routes::health::check_health))
        .route("/routes/payments/initialize", post(routes::payments::initialize_payment))
        .route("/routes/payments/verify/{reference}", get(routes::payments::verify_payment))
        .route(
            "/routes/payments/subscription-status",
            get(routes::payments::get_subscription_status),
        )
        .route("/routes/payments/quota-status", get(routes::payments::get_quota_status))
        .route("/routes/payments/webhook", post(routes::payments::paystack_webhook))
        .route("/routes/quests/create", post(routes::quests::create_quest))
        .route("/routes/quests/list", get(routes::quests::list_quests))
        .route("/routes/quests/complete-today", post(routes::quests::complete_today))
        .route("/routes/quests/delete/{quest_id}", delete(routes::quests::delete_quest))
        .route("/routes/rivals/get", get(routes::rivals::get_rival))
        .route("/routes/rivals/list", get(routes::rivals::list_rivals))
        .route("/routes/rivals/generate", post(routes::rivals::generate_rival))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}
