// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Efectivo,
    Tarjeta,
    Transferencia,
    TigoMoney,
    Claro,
    Credito,
    Mixto,
}

// A venda é gravada antes do PDF: PENDIENTE até o arquivo existir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pendiente,
    Generada,
}

pub const SALE_STATUS_COMPLETED: &str = "completada";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i32,
    pub invoice_number: i64,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub total: Decimal,
    pub final_total: Decimal,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_rtn: Option<String>,
    pub seller_name: String,
    pub invoice_status: InvoiceStatus,
    pub invoice_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i32,
    pub sale_id: i32,
    pub product_id: Option<i32>,
    pub service_code: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Identificador de linha como chega do caixa: número (produto) ou texto.
/// Textos que começam com `S` são serviços e não movimentam estoque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LineItemRef {
    Id(i32),
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTarget {
    Product(i32),
    Service(String),
}

impl LineItemRef {
    pub fn target(&self) -> Option<LineTarget> {
        match self {
            LineItemRef::Id(id) => Some(LineTarget::Product(*id)),
            LineItemRef::Code(code) if code.starts_with('S') => {
                Some(LineTarget::Service(code.clone()))
            }
            LineItemRef::Code(code) => code.trim().parse().ok().map(LineTarget::Product),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub item_id: LineItemRef,

    #[validate(length(min = 1, message = "La descripción es obligatoria."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(range(min = 1, message = "La cantidad debe ser mayor que cero."))]
    pub quantity: i32,
}

impl SaleLineRequest {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSaleRequest {
    #[validate(length(min = 1, message = "La venta debe tener al menos un artículo."), nested)]
    pub items: Vec<SaleLineRequest>,

    #[validate(custom(function = "validate_not_negative"))]
    pub total: Decimal,

    pub customer_name: Option<String>,
    pub customer_rtn: Option<String>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub ok: bool,
    pub message: String,
    pub invoice_number: i64,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_refs_split_products_and_services() {
        assert_eq!(LineItemRef::Id(7).target(), Some(LineTarget::Product(7)));
        assert_eq!(
            LineItemRef::Code("S12".into()).target(),
            Some(LineTarget::Service("S12".into()))
        );
        assert_eq!(LineItemRef::Code("42".into()).target(), Some(LineTarget::Product(42)));
        assert_eq!(LineItemRef::Code("abc".into()).target(), None);
    }

    #[test]
    fn line_ref_deserializes_numbers_and_strings() {
        let lines: Vec<LineItemRef> = serde_json::from_str(r#"[3, "S1", "9"]"#).unwrap();
        assert_eq!(lines[0], LineItemRef::Id(3));
        assert_eq!(lines[1], LineItemRef::Code("S1".into()));
        assert_eq!(lines[2].target(), Some(LineTarget::Product(9)));
    }

    #[test]
    fn line_total_is_price_times_quantity() {
        let line = SaleLineRequest {
            item_id: LineItemRef::Id(1),
            name: "Cable USB".into(),
            price: Decimal::new(12550, 2),
            quantity: 3,
        };
        assert_eq!(line.line_total(), Decimal::new(37650, 2));
    }

    #[test]
    fn sale_request_rejects_empty_items_and_zero_quantity() {
        let empty = RegisterSaleRequest {
            items: vec![],
            total: Decimal::ZERO,
            customer_name: None,
            customer_rtn: None,
            payment_method: PaymentMethod::Efectivo,
        };
        assert!(empty.validate().is_err());

        let zero_qty = RegisterSaleRequest {
            items: vec![SaleLineRequest {
                item_id: LineItemRef::Id(1),
                name: "Mouse".into(),
                price: Decimal::from(100),
                quantity: 0,
            }],
            total: Decimal::from(100),
            customer_name: None,
            customer_rtn: None,
            payment_method: PaymentMethod::Tarjeta,
        };
        let errors = zero_qty.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }
}
