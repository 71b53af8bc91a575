// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::sales::{RegisterSaleRequest, SaleReceipt},
    services::document_service::invoice_file_name,
};

pub(crate) fn pdf_response(file_name: &str, bytes: Vec<u8>) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file_name),
        ),
    ];
    (headers, bytes).into_response()
}

// ---
// Handler: registrar venda (estoque + fatura)
// ---
#[utoipa::path(
    post,
    path = "/api/ventas/registrar",
    tag = "Ventas",
    security(("api_jwt" = [])),
    request_body = RegisterSaleRequest,
    responses(
        (status = 201, description = "Venda registrada e fatura gerada", body = SaleReceipt),
        (status = 400, description = "Carrinho inválido"),
        (status = 404, description = "Produto não encontrado"),
        (status = 500, description = "Venda gravada, fatura pendente")
    )
)]
pub async fn register_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(seller): AuthenticatedUser,
    Json(payload): Json<RegisterSaleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let receipt = app_state
        .sale_service
        .register_sale(&payload, &seller)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/api/ventas/{invoice_number}/factura",
    tag = "Ventas",
    security(("api_jwt" = [])),
    params(("invoice_number" = i64, Path, description = "Número da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn download_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(invoice_number): Path<i64>,
) -> Result<Response, ApiError> {
    let bytes = app_state
        .sale_service
        .invoice_pdf(invoice_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(&invoice_file_name(invoice_number), bytes))
}

// Nova tentativa para vendas que ficaram PENDIENTE
pub async fn regenerate_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(invoice_number): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = app_state
        .sale_service
        .regenerate_invoice(invoice_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_response_sets_content_headers() {
        let response = pdf_response("factura_7.pdf", b"%PDF".to_vec());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"factura_7.pdf\""
        );
    }
}
