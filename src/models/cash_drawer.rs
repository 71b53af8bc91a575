// src/models/cash_drawer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "drawer_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DrawerState {
    Abierta,
    Cerrada,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashDrawer {
    pub id: i32,
    pub opening_user: i32,
    pub opening_time: DateTime<Utc>,
    pub opening_float: Decimal,
    pub closing_time: Option<DateTime<Utc>>,
    pub total_cash: Option<Decimal>,
    pub total_card: Option<Decimal>,
    pub total_transfer: Option<Decimal>,
    pub wallet_tigo: Option<Decimal>,
    pub wallet_claro: Option<Decimal>,
    pub shortage: Option<Decimal>,
    pub gross_sales: Option<Decimal>,
    pub shift: Option<i16>,
    pub state: DrawerState,
}

// Dados do último corte (tela de abertura)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingInfo {
    pub id: i32,
    pub closing_time: DateTime<Utc>,
    pub total_cash: Decimal,
    pub total_card: Decimal,
    pub total_transfer: Decimal,
    pub wallet_tigo: Decimal,
    pub wallet_claro: Decimal,
    pub shortage: Decimal,
    pub gross_sales: Decimal,
    pub shift: i16,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenDrawerRequest {
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub opening_float: Decimal,
}

/// Totais contados no corte, por meio de pagamento.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseDrawerRequest {
    #[validate(custom(function = "validate_not_negative"))]
    pub total_cash: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    pub total_card: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    pub total_transfer: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub wallet_tigo: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub wallet_claro: Decimal,
    #[serde(default)]
    pub shortage: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub cash_equivalent: Decimal,
    pub gross_sales: Decimal,
}

impl Settlement {
    /// Efetivo + carteiras descontando o fundo fixo, somando transferência e cartão.
    /// O fundo usado é a base configurada, não o fundo de abertura da caja.
    pub fn compute(totals: &CloseDrawerRequest, base_float: Decimal) -> Self {
        let cash_equivalent = totals.total_cash + totals.wallet_tigo + totals.wallet_claro;
        let gross_sales = (cash_equivalent - base_float) + totals.total_transfer + totals.total_card;
        Self { cash_equivalent, gross_sales }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(cash: i64, tigo: i64, claro: i64, transfer: i64, card: i64) -> CloseDrawerRequest {
        CloseDrawerRequest {
            total_cash: Decimal::from(cash),
            total_card: Decimal::from(card),
            total_transfer: Decimal::from(transfer),
            wallet_tigo: Decimal::from(tigo),
            wallet_claro: Decimal::from(claro),
            shortage: Decimal::ZERO,
        }
    }

    #[test]
    fn settlement_literal_case() {
        let s = Settlement::compute(&totals(6000, 0, 0, 500, 300), Decimal::from(5000));
        assert_eq!(s.cash_equivalent, Decimal::from(6000));
        assert_eq!(s.gross_sales, Decimal::from(1800));
    }

    #[test]
    fn wallets_count_as_cash() {
        let s = Settlement::compute(&totals(4000, 700, 300, 0, 0), Decimal::from(5000));
        assert_eq!(s.cash_equivalent, Decimal::from(5000));
        assert_eq!(s.gross_sales, Decimal::ZERO);
    }

    #[test]
    fn gross_sales_can_be_negative_when_cash_is_short_of_float() {
        let s = Settlement::compute(&totals(4500, 0, 0, 0, 200), Decimal::from(5000));
        assert_eq!(s.gross_sales, Decimal::from(-300));
    }

    #[test]
    fn shortage_does_not_enter_the_formula() {
        let mut t = totals(6000, 0, 0, 500, 300);
        t.shortage = Decimal::from(50);
        assert_eq!(Settlement::compute(&t, Decimal::from(5000)).gross_sales, Decimal::from(1800));
    }
}
