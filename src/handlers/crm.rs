// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
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
    models::crm::{
        CreateCreditCustomerPayload, CreditAmountPayload, Customer, DebtAdjustmentPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/clientes/credito",
    tag = "Clientes",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Clientes com crédito", body = [Customer]))
)]
pub async fn list_credit_customers(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .crm_service
        .list_credit_customers()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(customers)))
}

#[utoipa::path(
    post,
    path = "/api/clientes/credito",
    tag = "Clientes",
    security(("api_jwt" = [])),
    request_body = CreateCreditCustomerPayload,
    responses((status = 201, description = "Cliente criado com crédito", body = Customer))
)]
pub async fn create_credit_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateCreditCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .create_credit_customer(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(customer, "Cliente registrado")),
    ))
}

pub async fn assign_credit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(customer_id): Path<i32>,
    Json(payload): Json<CreditAmountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .assign_credit(customer_id, payload.amount)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(customer, "Crédito asignado")))
}

// Valor positivo soma à dívida, negativo abate (abono)
pub async fn adjust_debt(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(customer_id): Path<i32>,
    Json(payload): Json<DebtAdjustmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .adjust_debt(customer_id, payload.amount)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(customer, "Deuda actualizada")))
}

pub async fn remove_credit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(customer_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .remove_credit(customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(customer, "Crédito retirado")))
}
