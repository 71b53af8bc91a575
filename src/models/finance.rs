// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_positive;

// --- Gastos diários ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i32,
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub date: NaiveDate,
    #[schema(example = "Pago de energía")]
    pub description: String,
    #[schema(example = "350.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    #[validate(length(min = 1, message = "La descripción es obligatoria."))]
    pub description: String,

    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,
}
