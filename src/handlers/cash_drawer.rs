// src/handlers/cash_drawer.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ApiResponse,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::cash_drawer::{CashDrawer, ClosingInfo, CloseDrawerRequest, OpenDrawerRequest},
};

#[utoipa::path(
    post,
    path = "/api/caja/abrir",
    tag = "Caja",
    security(("api_jwt" = [])),
    request_body = OpenDrawerRequest,
    responses((status = 201, description = "Caja aberta", body = CashDrawer))
)]
pub async fn open_drawer(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<OpenDrawerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let drawer = app_state
        .cash_drawer_service
        .open(&app_state.db_pool, user.id, payload.opening_float)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(drawer, "Caja abierta")),
    ))
}

// Corte de caja
#[utoipa::path(
    post,
    path = "/api/caja/cerrar",
    tag = "Caja",
    security(("api_jwt" = [])),
    request_body = CloseDrawerRequest,
    responses(
        (status = 200, description = "Caja fechada", body = CashDrawer),
        (status = 409, description = "Nenhuma caja aberta")
    )
)]
pub async fn close_drawer(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CloseDrawerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let drawer = app_state
        .cash_drawer_service
        .close(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(drawer, "Caja cerrada")))
}

#[utoipa::path(
    get,
    path = "/api/caja/abierta",
    tag = "Caja",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Caja aberta, se houver", body = Option<CashDrawer>))
)]
pub async fn current_drawer(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let drawer = app_state
        .cash_drawer_service
        .current()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(drawer)))
}

#[utoipa::path(
    get,
    path = "/api/caja/ultimo-corte-info",
    tag = "Caja",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Último corte", body = Option<ClosingInfo>))
)]
pub async fn last_closing(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let closing = app_state
        .cash_drawer_service
        .last_closing()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(closing)))
}
