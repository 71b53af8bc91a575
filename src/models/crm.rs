// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_not_negative;

// Cliente com crédito (fiado)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub has_credit: bool,
    pub debt_amount: Decimal,
    pub credit_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditCustomerPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditAmountPayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
}

// Ajuste de dívida: positivo aumenta, negativo abate
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtAdjustmentPayload {
    pub amount: Decimal,
}
