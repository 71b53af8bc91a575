// src/db/alert_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::inventory::{Alert, AlertWithProduct},
};

#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: i32,
        stock: i32,
        message: &str,
    ) -> Result<Alert, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO inventory_alerts (product_id, stock_at_creation, message)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, stock_at_creation, message, created_at, attended
            "#,
        )
        .bind(product_id)
        .bind(stock)
        .bind(message)
        .fetch_one(executor)
        .await?;
        Ok(alert)
    }

    /// Alerta pendente mais recente do produto.
    pub async fn latest_outstanding<'e, E>(
        &self,
        executor: E,
        product_id: i32,
    ) -> Result<Option<Alert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, product_id, stock_at_creation, message, created_at, attended
            FROM inventory_alerts
            WHERE product_id = $1 AND attended = false
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(alert)
    }

    // Reaproveita o alerta pendente com o saldo atual
    pub async fn refresh<'e, E>(
        &self,
        executor: E,
        alert_id: i32,
        stock: i32,
        message: &str,
    ) -> Result<Alert, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Alert>(
            r#"
            UPDATE inventory_alerts
            SET stock_at_creation = $1, message = $2, created_at = NOW()
            WHERE id = $3
            RETURNING id, product_id, stock_at_creation, message, created_at, attended
            "#,
        )
        .bind(stock)
        .bind(message)
        .bind(alert_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::AlertNotFound(alert_id))
    }

    pub async fn attend_all_for_product<'e, E>(
        &self,
        executor: E,
        product_id: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_alerts SET attended = true WHERE product_id = $1 AND attended = false",
        )
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_attended(&self, alert_id: i32) -> Result<Alert, AppError> {
        sqlx::query_as::<_, Alert>(
            r#"
            UPDATE inventory_alerts
            SET attended = true
            WHERE id = $1
            RETURNING id, product_id, stock_at_creation, message, created_at, attended
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AlertNotFound(alert_id))
    }

    pub async fn list_outstanding(&self) -> Result<Vec<AlertWithProduct>, AppError> {
        let alerts = sqlx::query_as::<_, AlertWithProduct>(
            r#"
            SELECT a.id, a.product_id, p.name AS product_name,
                   a.stock_at_creation, a.message, a.created_at
            FROM inventory_alerts a
            JOIN products p ON p.id = a.product_id
            WHERE a.attended = false
            ORDER BY a.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(alerts)
    }
}
