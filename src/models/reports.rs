// src/models/reports.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

// Uma caja fechada, agrupável por (data, turno)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReportRow {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub shift: i16,
    pub gross_sales: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub day_shift: Decimal,
    pub night_shift: Decimal,
    pub total: Decimal,
    pub goal: Decimal,
    pub goal_met: bool,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralReport {
    pub days: u32,
    #[schema(value_type = Object)]
    pub summary: BTreeMap<NaiveDate, DailySummary>,
    pub total_day: Decimal,
    pub total_night: Decimal,
    pub total: Decimal,
}

// ?dias=N
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DaysQuery {
    #[serde(alias = "dias")]
    pub days: Option<u32>,
}

/// Janela máxima aceita em `?dias=` (dez anos).
pub const MAX_REPORT_DAYS: u32 = 3650;

impl DaysQuery {
    /// Dias pedidos, ou `default` quando ausente ou zero.
    pub fn resolve(&self, default: u32) -> Result<u32, AppError> {
        match self.days {
            Some(d) if d > MAX_REPORT_DAYS => Err(AppError::InvalidInput(format!(
                "dias fuera de rango (máximo {}): {}",
                MAX_REPORT_DAYS, d
            ))),
            Some(d) if d > 0 => Ok(d),
            _ => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(days: Option<u32>) -> DaysQuery {
        DaysQuery { days }
    }

    #[test]
    fn missing_or_zero_days_use_default() {
        assert_eq!(query(None).resolve(7).unwrap(), 7);
        assert_eq!(query(Some(0)).resolve(30).unwrap(), 30);
        assert_eq!(query(Some(15)).resolve(30).unwrap(), 15);
    }

    #[test]
    fn huge_day_windows_are_rejected() {
        assert_eq!(query(Some(MAX_REPORT_DAYS)).resolve(7).unwrap(), MAX_REPORT_DAYS);
        assert!(matches!(
            query(Some(u32::MAX)).resolve(7),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            query(Some(2_147_483_648)).resolve(7),
            Err(AppError::InvalidInput(_))
        ));
    }
}
