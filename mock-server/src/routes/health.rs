use axum::Json;

use crate::models::HealthResponse;

pub async fn check_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
