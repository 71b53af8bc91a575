// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::validate_not_negative;

// --- Tipo de movimentação (enum do Postgres `movement_kind`) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Entrada, // Vira "ENTRADA"
    Salida,  // Vira "SALIDA"
}

impl MovementKind {
    /// Delta assinado aplicado ao estoque.
    pub fn signed(self, quantity: i32) -> i32 {
        match self {
            MovementKind::Entrada => quantity,
            MovementKind::Salida => -quantity,
        }
    }
}

// --- Produto ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub stock: i32,
    pub stock_minimum: i32,
    pub price: Decimal,
    pub wholesale_price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Nível de alerta derivado do saldo (listagem de inventário).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Agotado,
    Bajo,
    Normal,
}

impl StockLevel {
    pub fn of(stock: i32, stock_minimum: i32) -> Self {
        if stock == 0 {
            StockLevel::Agotado
        } else if stock <= stock_minimum {
            StockLevel::Bajo
        } else {
            StockLevel::Normal
        }
    }
}

// Linha da listagem geral (produto + categoria)
#[derive(Debug, Clone, FromRow)]
pub struct ProductListingRow {
    pub id: i32,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub stock: i32,
    pub stock_minimum: i32,
    pub price: Decimal,
    pub wholesale_price: Decimal,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: i32,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub stock: i32,
    pub stock_minimum: i32,
    pub price: Decimal,
    pub wholesale_price: Decimal,
    pub active: bool,
    pub alert: StockLevel,
}

impl From<ProductListingRow> for ProductListing {
    fn from(row: ProductListingRow) -> Self {
        Self {
            alert: StockLevel::of(row.stock, row.stock_minimum),
            id: row.id,
            barcode: row.barcode,
            name: row.name,
            description: row.description,
            category: row.category,
            stock: row.stock,
            stock_minimum: row.stock_minimum,
            price: row.price,
            wholesale_price: row.wholesale_price,
            active: row.active,
        }
    }
}

// Snapshot do produto travado (SELECT ... FOR UPDATE)
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub id: i32,
    pub name: String,
    pub stock: i32,
    pub stock_minimum: i32,
}

// --- Histórico (livro-razão) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: i32,
    pub product_id: i32,
    pub kind: MovementKind,
    pub quantity: i32,
    pub user_id: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLogEntry {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub kind: MovementKind,
    pub quantity: i32,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

// --- Alertas ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i32,
    pub product_id: i32,
    pub stock_at_creation: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub attended: bool,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertWithProduct {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub stock_at_creation: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// Catálogo de serviços (linhas sem estoque)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub fixed_price: bool,
}

/// Resultado de uma movimentação aplicada pelo livro-razão.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementOutcome {
    pub movement: InventoryMovement,
    pub stock: i32,
    pub stock_minimum: i32,
    pub alert: Option<Alert>,
    pub cleared_alerts: u64,
}

// --- Payloads (DTOs) ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "El código de barras es obligatorio."))]
    pub barcode: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub category_id: Option<i32>,

    #[validate(range(min = 0, message = "El stock inicial no puede ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    #[validate(range(min = 0, message = "El stock mínimo no puede ser negativo."))]
    #[serde(default)]
    pub stock_minimum: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub wholesale_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricePayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub wholesale_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "El código de barras es obligatorio."))]
    pub barcode: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
}

// Entrada/saída manual pelo livro-razão
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementPayload {
    pub product_id: i32,

    #[validate(range(min = 1, message = "La cantidad debe ser mayor que cero."))]
    pub quantity: i32,

    #[serde(default)]
    pub reason: String,
}

// ?codigo=7501234567890
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BarcodeQuery {
    #[serde(alias = "codigo", default)]
    pub barcode: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovementsQuery {
    #[serde(alias = "producto_id")]
    pub product_id: i32,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceSuggestQuery {
    #[serde(default)]
    pub q: String,
}
