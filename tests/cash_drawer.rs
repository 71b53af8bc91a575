mod common;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use caja_pos::{
    common::error::AppError,
    models::cash_drawer::{CloseDrawerRequest, DrawerState},
};
use common::{cash_drawer_service, count, seed_user};

fn totals(cash: i64, card: i64, transfer: i64) -> CloseDrawerRequest {
    CloseDrawerRequest {
        total_cash: Decimal::from(cash),
        total_card: Decimal::from(card),
        total_transfer: Decimal::from(transfer),
        wallet_tigo: Decimal::ZERO,
        wallet_claro: Decimal::ZERO,
        shortage: Decimal::ZERO,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn opening_again_force_closes_the_previous_drawer(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let drawers = cash_drawer_service(&pool);

    let first = drawers.open(&pool, user.id, Decimal::from(5000)).await.unwrap();
    let second = drawers.open(&pool, user.id, Decimal::from(5000)).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM cash_drawer WHERE state = 'abierta'").await,
        1
    );
    let current = drawers.current().await.unwrap().unwrap();
    assert_eq!(current.id, second.id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn closing_without_open_drawer_changes_nothing(pool: PgPool) {
    let drawers = cash_drawer_service(&pool);

    let err = drawers.close(&pool, &totals(6000, 0, 0)).await.unwrap_err();

    assert!(matches!(err, AppError::NoOpenDrawer));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM cash_drawer").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn closing_records_gross_sales_and_shift(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let drawers = cash_drawer_service(&pool);
    drawers.open(&pool, user.id, Decimal::from(5000)).await.unwrap();

    // Segunda 2025-03-03 17:00 em Honduras (23:00 UTC): turno da noite
    let now = Utc.with_ymd_and_hms(2025, 3, 3, 23, 0, 0).unwrap();
    let closed = drawers
        .close_at(&pool, &totals(6000, 300, 500), now)
        .await
        .unwrap();

    assert_eq!(closed.state, DrawerState::Cerrada);
    assert_eq!(closed.gross_sales, Some(Decimal::from(1800)));
    assert_eq!(closed.shift, Some(2));
    assert!(drawers.current().await.unwrap().is_none());

    let last = drawers.last_closing().await.unwrap().unwrap();
    assert_eq!(last.id, closed.id);

    // Segundo corte: já não há caja aberta
    let err = drawers.close(&pool, &totals(6000, 0, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::NoOpenDrawer));
}
