// src/handlers/inventory.rs

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
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::inventory::{
        AlertWithProduct, BarcodeQuery, CreateProductPayload, MovementKind, MovementOutcome,
        MovementsQuery, Product, ProductListing, ServiceItem, ServiceSuggestQuery,
        StockMovementPayload, UpdatePricePayload, UpdateProductPayload,
    },
};

// Motivo quando o operador não informa nenhum
fn movement_reason(kind: MovementKind, reason: &str) -> String {
    let reason = reason.trim();
    if !reason.is_empty() {
        return reason.to_string();
    }
    match kind {
        MovementKind::Entrada => "Entrada manual".to_string(),
        MovementKind::Salida => "Salida manual".to_string(),
    }
}

// ---
// Handler: busca por código de barras (tela de venda)
// ---
#[utoipa::path(
    get,
    path = "/api/productos/buscar",
    tag = "Inventario",
    security(("api_jwt" = [])),
    params(BarcodeQuery),
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Código não cadastrado")
    )
)]
pub async fn find_by_barcode(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<BarcodeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.barcode.trim().is_empty() {
        return Err(AppError::InvalidInput("código de barras vacío".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    }

    let product = app_state
        .inventory_service
        .find_by_barcode(&query.barcode)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(product)))
}

#[utoipa::path(
    get,
    path = "/api/inventario/productos",
    tag = "Inventario",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Produtos com nível de alerta", body = [ProductListing]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .inventory_service
        .list_products()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(products)))
}

#[utoipa::path(
    post,
    path = "/api/inventario/productos",
    tag = "Inventario",
    security(("api_jwt" = [])),
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 409, description = "Código de barras duplicado")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .create_product(&app_state.db_pool, &payload, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(product, "Producto creado")),
    ))
}

pub async fn update_price(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdatePricePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .update_price(product_id, payload.price, payload.wholesale_price)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(product, "Precio actualizado")))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .update_product(product_id, &payload.barcode, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(product, "Producto actualizado")))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_product(&app_state.db_pool, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::message("Producto eliminado")))
}

pub async fn movement_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<MovementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .inventory_service
        .movement_history(query.product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(movements)))
}

// Entrada e saída passam pelo mesmo livro-razão
async fn stock_movement(
    app_state: &AppState,
    locale: &Locale,
    user_id: i32,
    kind: MovementKind,
    payload: &StockMovementPayload,
) -> Result<MovementOutcome, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))?;

    let reason = movement_reason(kind, &payload.reason);
    app_state
        .inventory_service
        .apply_movement(
            &app_state.db_pool,
            payload.product_id,
            kind,
            payload.quantity,
            user_id,
            &reason,
            &reason,
        )
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))
}

#[utoipa::path(
    post,
    path = "/api/inventario/entrada",
    tag = "Inventario",
    security(("api_jwt" = [])),
    request_body = StockMovementPayload,
    responses(
        (status = 200, description = "Entrada registrada", body = MovementOutcome),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn stock_in(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome =
        stock_movement(&app_state, &locale, user.id, MovementKind::Entrada, &payload).await?;
    Ok(Json(ApiResponse::with_message(outcome, "Entrada registrada")))
}

#[utoipa::path(
    post,
    path = "/api/inventario/salida",
    tag = "Inventario",
    security(("api_jwt" = [])),
    request_body = StockMovementPayload,
    responses(
        (status = 200, description = "Saída registrada", body = MovementOutcome),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn stock_out(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome =
        stock_movement(&app_state, &locale, user.id, MovementKind::Salida, &payload).await?;
    Ok(Json(ApiResponse::with_message(outcome, "Salida registrada")))
}

#[utoipa::path(
    get,
    path = "/api/inventario/alertas",
    tag = "Inventario",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Alertas pendentes", body = [AlertWithProduct]))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .alert_service
        .list_outstanding()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(alerts)))
}

pub async fn attend_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(alert_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = app_state
        .alert_service
        .mark_attended(alert_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(alert, "Alerta atendida")))
}

#[utoipa::path(
    get,
    path = "/api/servicios/sugerencias",
    tag = "Servicios",
    security(("api_jwt" = [])),
    params(ServiceSuggestQuery),
    responses((status = 200, description = "Até 10 serviços", body = [ServiceItem]))
)]
pub async fn suggest_services(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ServiceSuggestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .inventory_service
        .suggest_services(&query.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(services)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_reason_falls_back_per_kind() {
        assert_eq!(movement_reason(MovementKind::Entrada, "  "), "Entrada manual");
        assert_eq!(movement_reason(MovementKind::Salida, ""), "Salida manual");
        assert_eq!(movement_reason(MovementKind::Salida, " Merma "), "Merma");
    }
}
