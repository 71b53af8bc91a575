// Utilitários compartilhados pelos testes com banco

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::FixedOffset;
use rust_decimal::Decimal;
use sqlx::PgPool;

use caja_pos::{
    common::error::AppError,
    db::{AlertRepository, CashDrawerRepository, ProductRepository, SaleRepository},
    models::auth::User,
    services::{
        alert_service::{AlertPolicy, AlertService},
        cash_drawer_service::CashDrawerService,
        document_service::{
            CompanyProfile, FsInvoiceStore, InvoiceDocument, InvoiceRenderer, InvoiceService,
        },
        inventory_service::InventoryService,
        sale_service::SaleService,
    },
};

pub fn honduras() -> FixedOffset {
    FixedOffset::west_opt(6 * 3600).unwrap()
}

pub async fn seed_user(pool: &PgPool, username: &str) -> User {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, username, password_hash, role)
        VALUES ($1, $2, 'x', 'cajero')
        RETURNING id, full_name, username, password_hash, role, active, created_at
        "#,
    )
    .bind(format!("Cajero {}", username))
    .bind(username)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_product(
    pool: &PgPool,
    barcode: &str,
    name: &str,
    stock: i32,
    stock_minimum: i32,
    price: Decimal,
) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO products (barcode, name, stock, stock_minimum, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(barcode)
    .bind(name)
    .bind(stock)
    .bind(stock_minimum)
    .bind(price)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn stock_of(pool: &PgPool, product_id: i32) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

pub fn inventory_service(pool: &PgPool, policy: AlertPolicy) -> InventoryService {
    InventoryService::new(
        ProductRepository::new(pool.clone()),
        AlertService::new(AlertRepository::new(pool.clone()), policy),
    )
}

pub fn cash_drawer_service(pool: &PgPool) -> CashDrawerService {
    CashDrawerService::new(
        CashDrawerRepository::new(pool.clone()),
        Decimal::from(5000),
        honduras(),
    )
}

/// Renderer falso: devolve bytes fixos, sem fontes.
pub struct StubRenderer;

#[async_trait]
impl InvoiceRenderer for StubRenderer {
    async fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
        Ok(format!("%PDF-stub {}", document.invoice_number).into_bytes())
    }
}

pub struct FailingRenderer;

#[async_trait]
impl InvoiceRenderer for FailingRenderer {
    async fn render(&self, _document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
        Err(AppError::FontNotFound("Roboto".into()))
    }
}

pub fn temp_invoice_dir() -> PathBuf {
    std::env::temp_dir().join(format!("facturas-it-{}", uuid::Uuid::new_v4()))
}

pub fn sale_service(
    pool: &PgPool,
    renderer: Arc<dyn InvoiceRenderer>,
    invoice_dir: PathBuf,
) -> SaleService {
    let invoices = InvoiceService::new(
        renderer,
        Arc::new(FsInvoiceStore::new(invoice_dir)),
        CompanyProfile::default(),
        honduras(),
    );
    SaleService::new(
        pool.clone(),
        SaleRepository::new(pool.clone()),
        inventory_service(pool, AlertPolicy::Append),
        invoices,
    )
}
