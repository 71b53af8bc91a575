// src/db/cash_drawer_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::cash_drawer::{CashDrawer, ClosingInfo, CloseDrawerRequest},
};

// Chave do advisory lock que serializa abertura/fechamento da caja
const DRAWER_LOCK_KEY: i64 = 0x4341_4a41; // "CAJA"

const DRAWER_COLUMNS: &str = "id, opening_user, opening_time, opening_float, closing_time, \
     total_cash, total_card, total_transfer, wallet_tigo, wallet_claro, shortage, gross_sales, \
     shift, state";

#[derive(Clone)]
pub struct CashDrawerRepository {
    pool: PgPool,
}

impl CashDrawerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vale até o fim da transação corrente.
    pub async fn lock_drawer<'e, E>(&self, executor: E) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(DRAWER_LOCK_KEY)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Fecha à força cajas esquecidas abertas (só o estado muda)
    pub async fn force_close_open<'e, E>(&self, executor: E) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<i32> = sqlx::query_scalar(
            "UPDATE cash_drawer SET state = 'cerrada' WHERE state = 'abierta' RETURNING id",
        )
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn insert_open<'e, E>(
        &self,
        executor: E,
        user_id: i32,
        opening_float: Decimal,
    ) -> Result<CashDrawer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let drawer = sqlx::query_as::<_, CashDrawer>(&format!(
            r#"
            INSERT INTO cash_drawer (opening_user, opening_float, state)
            VALUES ($1, $2, 'abierta')
            RETURNING {}
            "#,
            DRAWER_COLUMNS
        ))
        .bind(user_id)
        .bind(opening_float)
        .fetch_one(executor)
        .await?;
        Ok(drawer)
    }

    pub async fn lock_open<'e, E>(&self, executor: E) -> Result<Option<CashDrawer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let drawer = sqlx::query_as::<_, CashDrawer>(&format!(
            "SELECT {} FROM cash_drawer WHERE state = 'abierta' ORDER BY id DESC LIMIT 1 FOR UPDATE",
            DRAWER_COLUMNS
        ))
        .fetch_optional(executor)
        .await?;
        Ok(drawer)
    }

    /// Grava o corte; `None` se a caja já não estava aberta.
    pub async fn close<'e, E>(
        &self,
        executor: E,
        id: i32,
        totals: &CloseDrawerRequest,
        gross_sales: Decimal,
        shift: i16,
    ) -> Result<Option<CashDrawer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let drawer = sqlx::query_as::<_, CashDrawer>(&format!(
            r#"
            UPDATE cash_drawer
            SET closing_time = NOW(),
                total_cash = $1,
                total_card = $2,
                total_transfer = $3,
                wallet_tigo = $4,
                wallet_claro = $5,
                shortage = $6,
                gross_sales = $7,
                shift = $8,
                state = 'cerrada'
            WHERE id = $9 AND state = 'abierta'
            RETURNING {}
            "#,
            DRAWER_COLUMNS
        ))
        .bind(totals.total_cash)
        .bind(totals.total_card)
        .bind(totals.total_transfer)
        .bind(totals.wallet_tigo)
        .bind(totals.wallet_claro)
        .bind(totals.shortage)
        .bind(gross_sales)
        .bind(shift)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(drawer)
    }

    pub async fn current(&self) -> Result<Option<CashDrawer>, AppError> {
        let drawer = sqlx::query_as::<_, CashDrawer>(&format!(
            "SELECT {} FROM cash_drawer WHERE state = 'abierta' ORDER BY id DESC LIMIT 1",
            DRAWER_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(drawer)
    }

    // Cajas fechadas à força não têm corte gravado e ficam de fora
    pub async fn last_closing(&self) -> Result<Option<ClosingInfo>, AppError> {
        let info = sqlx::query_as::<_, ClosingInfo>(
            r#"
            SELECT id, closing_time, total_cash, total_card, total_transfer,
                   wallet_tigo, wallet_claro, shortage, gross_sales, shift
            FROM cash_drawer
            WHERE state = 'cerrada' AND closing_time IS NOT NULL
            ORDER BY closing_time DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(info)
    }
}
