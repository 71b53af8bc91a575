// src/db/report_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::reports::ShiftReportRow};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cortes gravados nos últimos N dias, um por linha.
    // A data é a do fuso da loja, não a do servidor.
    pub async fn closed_shifts_since(
        &self,
        days: u32,
        utc_offset_hours: i32,
    ) -> Result<Vec<ShiftReportRow>, AppError> {
        let days = i32::try_from(days)
            .map_err(|_| AppError::InvalidInput(format!("dias fuera de rango: {}", days)))?;
        let rows = sqlx::query_as::<_, ShiftReportRow>(
            r#"
            SELECT ((closing_time AT TIME ZONE 'UTC') + make_interval(hours => $2))::date AS date,
                   shift,
                   gross_sales
            FROM cash_drawer
            WHERE state = 'cerrada'
              AND closing_time IS NOT NULL
              AND shift IS NOT NULL
              AND gross_sales IS NOT NULL
              AND closing_time >= NOW() - make_interval(days => $1)
            ORDER BY closing_time DESC, shift ASC
            "#,
        )
        .bind(days)
        .bind(utc_offset_hours)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
