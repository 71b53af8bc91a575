// src/db/expense_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{common::error::AppError, models::finance::Expense};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_since(&self, days: u32) -> Result<Vec<Expense>, AppError> {
        let days = i32::try_from(days)
            .map_err(|_| AppError::InvalidInput(format!("dias fuera de rango: {}", days)))?;
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, date, description, amount, created_at
            FROM expenses
            WHERE date >= CURRENT_DATE - $1::int
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    pub async fn create(&self, description: &str, amount: Decimal) -> Result<Expense, AppError> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (description, amount)
            VALUES ($1, $2)
            RETURNING id, date, description, amount, created_at
            "#,
        )
        .bind(description)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn update(
        &self,
        id: i32,
        description: &str,
        amount: Decimal,
    ) -> Result<Expense, AppError> {
        sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET description = $1, amount = $2
            WHERE id = $3
            RETURNING id, date, description, amount, created_at
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ExpenseNotFound(id))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ExpenseNotFound(id));
        }
        Ok(())
    }
}
