// src/handlers/health.rs

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true, "status": "up" }))
}

// Confirma que o banco responde
pub async fn db_time(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
        .fetch_one(&app_state.db_pool)
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "ok": true, "now": now })))
}
