// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::{error::ApiError, response::ApiResponse},
    config::AppState,
    handlers::sales::pdf_response,
    middleware::i18n::Locale,
    models::reports::{DaysQuery, GeneralReport, ShiftReportRow},
};

const SHIFT_REPORT_DAYS: u32 = 7;
const GENERAL_REPORT_DAYS: u32 = 30;

#[utoipa::path(
    get,
    path = "/api/reportes/turnos",
    tag = "Reportes",
    security(("api_jwt" = [])),
    params(DaysQuery),
    responses((status = 200, description = "Cortes por turno", body = [ShiftReportRow]))
)]
pub async fn shift_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DaysQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query
        .resolve(SHIFT_REPORT_DAYS)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let rows = app_state
        .report_service
        .shift_report(days)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reportes/general",
    tag = "Reportes",
    security(("api_jwt" = [])),
    params(DaysQuery),
    responses((status = 200, description = "Resumo diário com meta", body = GeneralReport))
)]
pub async fn general_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DaysQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query
        .resolve(GENERAL_REPORT_DAYS)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let report = app_state
        .report_service
        .general(days)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(report)))
}

pub async fn general_report_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DaysQuery>,
) -> Result<Response, ApiError> {
    let days = query
        .resolve(GENERAL_REPORT_DAYS)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let bytes = app_state
        .report_service
        .general_pdf(days)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(&format!("reporte_general_{}_dias.pdf", days), bytes))
}
