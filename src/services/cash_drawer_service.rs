// src/services/cash_drawer_service.rs

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::CashDrawerRepository,
    models::cash_drawer::{CashDrawer, ClosingInfo, CloseDrawerRequest, Settlement},
    services::shift,
};

#[derive(Clone)]
pub struct CashDrawerService {
    drawer_repo: CashDrawerRepository,
    base_float: Decimal,
    offset: FixedOffset,
}

impl CashDrawerService {
    pub fn new(drawer_repo: CashDrawerRepository, base_float: Decimal, offset: FixedOffset) -> Self {
        Self { drawer_repo, base_float, offset }
    }

    /// Abre uma caja nova; qualquer caja esquecida aberta é fechada antes.
    pub async fn open<'e, A>(
        &self,
        conn: A,
        user_id: i32,
        opening_float: Decimal,
    ) -> Result<CashDrawer, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        self.drawer_repo.lock_drawer(&mut *tx).await?;

        let forced = self.drawer_repo.force_close_open(&mut *tx).await?;
        if !forced.is_empty() {
            tracing::warn!(?forced, "Cajas abiertas fechadas à força antes da abertura");
        }

        let drawer = self
            .drawer_repo
            .insert_open(&mut *tx, user_id, opening_float)
            .await?;

        tx.commit().await?;

        tracing::info!(drawer_id = drawer.id, user_id, "Caja aberta");
        Ok(drawer)
    }

    pub async fn close<'e, A>(
        &self,
        conn: A,
        totals: &CloseDrawerRequest,
    ) -> Result<CashDrawer, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        self.close_at(conn, totals, Utc::now()).await
    }

    /// Corte de caja com o relógio informado (o turno sai dele).
    pub async fn close_at<'e, A>(
        &self,
        conn: A,
        totals: &CloseDrawerRequest,
        now: DateTime<Utc>,
    ) -> Result<CashDrawer, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        // Um segundo corte concorrente espera aqui e depois não acha caja aberta
        let open = self
            .drawer_repo
            .lock_open(&mut *tx)
            .await?
            .ok_or(AppError::NoOpenDrawer)?;

        let settlement = Settlement::compute(totals, self.base_float);
        let shift = shift::classify_at(now, self.offset);

        let closed = self
            .drawer_repo
            .close(&mut *tx, open.id, totals, settlement.gross_sales, shift.code())
            .await?
            .ok_or(AppError::NoOpenDrawer)?;

        tx.commit().await?;

        tracing::info!(
            drawer_id = closed.id,
            gross_sales = %settlement.gross_sales,
            shift = shift.code(),
            "Caja cerrada"
        );
        Ok(closed)
    }

    pub async fn current(&self) -> Result<Option<CashDrawer>, AppError> {
        self.drawer_repo.current().await
    }

    pub async fn last_closing(&self) -> Result<Option<ClosingInfo>, AppError> {
        self.drawer_repo.last_closing().await
    }
}
