// src/db/sale_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::sales::{PaymentMethod, Sale, SaleItem, SALE_STATUS_COMPLETED},
};

const SALE_COLUMNS: &str = "id, invoice_number, user_id, created_at, payment_method, total, \
     final_total, status, customer_name, customer_rtn, seller_name, invoice_status, invoice_file";

// Cabeçalho da venda
#[derive(Debug, Clone)]
pub struct NewSale<'a> {
    pub user_id: i32,
    pub payment_method: PaymentMethod,
    pub total: Decimal,
    pub customer_name: Option<&'a str>,
    pub customer_rtn: Option<&'a str>,
    pub seller_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct NewSaleItem<'a> {
    pub product_id: Option<i32>,
    pub service_code: Option<&'a str>,
    pub description: &'a str,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava a venda; o número de fatura sai da sequência do banco.
    pub async fn insert_sale<'e, E>(&self, executor: E, sale: &NewSale<'_>) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales
                (user_id, payment_method, total, final_total, status,
                 customer_name, customer_rtn, seller_name)
            VALUES ($1, $2, $3, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SALE_COLUMNS
        ))
        .bind(sale.user_id)
        .bind(sale.payment_method)
        .bind(sale.total)
        .bind(SALE_STATUS_COMPLETED)
        .bind(sale.customer_name)
        .bind(sale.customer_rtn)
        .bind(sale.seller_name)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: i32,
        item: &NewSaleItem<'_>,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items
                (sale_id, product_id, service_code, description, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, sale_id, product_id, service_code, description, quantity, unit_price, line_total
            "#,
        )
        .bind(sale_id)
        .bind(item.product_id)
        .bind(item.service_code)
        .bind(item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.line_total)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn find_by_invoice(&self, invoice_number: i64) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {} FROM sales WHERE invoice_number = $1",
            SALE_COLUMNS
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn list_items(&self, sale_id: i32) -> Result<Vec<SaleItem>, AppError> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, service_code, description, quantity, unit_price, line_total
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn mark_invoice_generated(
        &self,
        sale_id: i32,
        file: &str,
    ) -> Result<Sale, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales
            SET invoice_status = 'GENERADA', invoice_file = $1
            WHERE id = $2
            RETURNING {}
            "#,
            SALE_COLUMNS
        ))
        .bind(file)
        .bind(sale_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(sale)
    }
}
