// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ApiResponse,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        finance::{Expense, ExpensePayload},
        reports::DaysQuery,
    },
};

const EXPENSE_LIST_DAYS: u32 = 7;

#[utoipa::path(
    get,
    path = "/api/reportes/gastos",
    tag = "Gastos",
    security(("api_jwt" = [])),
    params(DaysQuery),
    responses((status = 200, description = "Gastos recentes", body = [Expense]))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DaysQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query
        .resolve(EXPENSE_LIST_DAYS)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let expenses = app_state
        .finance_service
        .list_expenses(days)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(expenses)))
}

#[utoipa::path(
    post,
    path = "/api/reportes/gastos",
    tag = "Gastos",
    security(("api_jwt" = [])),
    request_body = ExpensePayload,
    responses((status = 201, description = "Gasto registrado", body = Expense))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let expense = app_state
        .finance_service
        .create_expense(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(expense, "Gasto registrado")),
    ))
}

pub async fn update_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(expense_id): Path<i32>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let expense = app_state
        .finance_service
        .update_expense(expense_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(expense, "Gasto actualizado")))
}

pub async fn delete_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(expense_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_expense(expense_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::message("Gasto eliminado")))
}
