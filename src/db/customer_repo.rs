// src/db/customer_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{common::error::AppError, models::crm::Customer};

const CUSTOMER_COLUMNS: &str = "id, name, phone, has_credit, debt_amount, credit_date";

// Clientes com crédito (fiado)
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_credit(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers WHERE has_credit = true ORDER BY name ASC",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn create_with_credit(
        &self,
        name: &str,
        phone: Option<&str>,
        amount: Decimal,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, phone, has_credit, debt_amount, credit_date)
            VALUES ($1, $2, true, $3, NOW())
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(name)
        .bind(phone)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn assign_credit(&self, id: i32, amount: Decimal) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET has_credit = true, debt_amount = $1, credit_date = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(amount)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CustomerNotFound(id))
    }

    // Soma assinada: positivo aumenta a dívida, negativo abate
    pub async fn adjust_debt(&self, id: i32, delta: Decimal) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET debt_amount = debt_amount + $1 WHERE id = $2 RETURNING {}",
            CUSTOMER_COLUMNS
        ))
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CustomerNotFound(id))
    }

    pub async fn remove_credit(&self, id: i32) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET has_credit = false, debt_amount = 0, credit_date = NULL
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CustomerNotFound(id))
    }
}
