// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::inventory::{
        InventoryLogEntry, InventoryMovement, MovementKind, Product, ProductListingRow,
        ProductStock, ServiceItem,
    },
};

// Dados para cadastrar um produto
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub barcode: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub category_id: Option<i32>,
    pub stock: i32,
    pub stock_minimum: i32,
    pub price: Decimal,
    pub wholesale_price: Decimal,
}

const PRODUCT_COLUMNS: &str = "id, barcode, name, description, category_id, stock, stock_minimum, \
     price, wholesale_price, active, created_at";

// Converte violação de unicidade do código de barras em Conflito
fn map_barcode_conflict(e: sqlx::Error, barcode: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("products_barcode_key") {
            return AppError::BarcodeAlreadyExists(barcode.to_string());
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE barcode = $1",
            PRODUCT_COLUMNS
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn list_with_category(&self) -> Result<Vec<ProductListingRow>, AppError> {
        let rows = sqlx::query_as::<_, ProductListingRow>(
            r#"
            SELECT p.id, p.barcode, p.name, p.description, c.name AS category,
                   p.stock, p.stock_minimum, p.price, p.wholesale_price, p.active
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_movements(&self, product_id: i32) -> Result<Vec<InventoryMovement>, AppError> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT id, product_id, kind, quantity, user_id, reason, created_at
            FROM inventory_movements
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    pub async fn suggest_services(&self, text: &str) -> Result<Vec<ServiceItem>, AppError> {
        let services = sqlx::query_as::<_, ServiceItem>(
            r#"
            SELECT id, name, price, fixed_price
            FROM services
            WHERE active = true AND name ILIKE $1
            ORDER BY name ASC
            LIMIT 10
            "#,
        )
        .bind(format!("%{}%", text))
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    // ---
    // Livro-razão (rodam dentro da transação do serviço)
    // ---

    /// Trava a linha do produto até o fim da transação.
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        id: i32,
    ) -> Result<Option<ProductStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, ProductStock>(
            "SELECT id, name, stock, stock_minimum FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    /// Trava várias linhas em ordem crescente de id; devolve os ids encontrados.
    pub async fn lock_many_for_update<'e, E>(
        &self,
        executor: E,
        ids: &[i32],
    ) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locked: Vec<i32> = sqlx::query_scalar(
            "SELECT id FROM products WHERE id = ANY($1) ORDER BY id ASC FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(locked)
    }

    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        product_id: i32,
        kind: MovementKind,
        quantity: i32,
        user_id: i32,
        reason: &str,
    ) -> Result<InventoryMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, InventoryMovement>(
            r#"
            INSERT INTO inventory_movements (product_id, kind, quantity, user_id, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, kind, quantity, user_id, reason, created_at
            "#,
        )
        .bind(product_id)
        .bind(kind)
        .bind(quantity)
        .bind(user_id)
        .bind(reason)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    pub async fn record_log<'e, E>(
        &self,
        executor: E,
        product_id: i32,
        user_id: i32,
        kind: MovementKind,
        quantity: i32,
        detail: &str,
    ) -> Result<InventoryLogEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, InventoryLogEntry>(
            r#"
            INSERT INTO inventory_log (product_id, user_id, kind, quantity, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, user_id, kind, quantity, detail, created_at
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(kind)
        .bind(quantity)
        .bind(detail)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    /// Soma o delta ao estoque e devolve o saldo pós-atualização.
    pub async fn apply_stock_delta<'e, E>(
        &self,
        executor: E,
        id: i32,
        delta: i32,
    ) -> Result<ProductStock, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductStock>(
            r#"
            UPDATE products
            SET stock = stock + $1
            WHERE id = $2
            RETURNING id, name, stock, stock_minimum
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound(id))
    }

    // ---
    // Cadastro
    // ---

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        new: &NewProduct<'_>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (barcode, name, description, category_id, stock, stock_minimum, price, wholesale_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(new.barcode)
        .bind(new.name)
        .bind(new.description)
        .bind(new.category_id)
        .bind(new.stock)
        .bind(new.stock_minimum)
        .bind(new.price)
        .bind(new.wholesale_price)
        .fetch_one(executor)
        .await
        .map_err(|e| map_barcode_conflict(e, new.barcode))
    }

    pub async fn update_price(
        &self,
        id: i32,
        price: Decimal,
        wholesale_price: Decimal,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET price = $1, wholesale_price = $2 WHERE id = $3 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(price)
        .bind(wholesale_price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn update_identity(
        &self,
        id: i32,
        barcode: &str,
        name: &str,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET barcode = $1, name = $2 WHERE id = $3 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(barcode)
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_barcode_conflict(e, barcode))?
        .ok_or(AppError::ProductNotFound(id))
    }

    // ---
    // Exclusão definitiva
    // ---

    pub async fn has_sales<'e, E>(&self, executor: E, id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sale_items WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn delete_dependencies(
        &self,
        conn: &mut sqlx::PgConnection,
        id: i32,
    ) -> Result<(), AppError> {
        for table in ["inventory_movements", "inventory_alerts", "inventory_log"] {
            sqlx::query(&format!("DELETE FROM {} WHERE product_id = $1", table))
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
