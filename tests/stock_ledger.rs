mod common;

use rust_decimal::Decimal;
use sqlx::PgPool;

use caja_pos::{
    common::error::AppError, models::inventory::MovementKind,
    services::alert_service::AlertPolicy,
};
use common::{count, inventory_service, seed_product, seed_user, stock_of};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn entrada_then_salida_nets_to_zero(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let product = seed_product(&pool, "750100", "Cable USB", 10, 2, Decimal::from(120)).await;
    let inventory = inventory_service(&pool, AlertPolicy::Append);

    inventory
        .apply_movement(&pool, product, MovementKind::Entrada, 5, user.id, "Compra", "Compra")
        .await
        .unwrap();
    let outcome = inventory
        .apply_movement(&pool, product, MovementKind::Salida, 5, user.id, "Ajuste", "Ajuste")
        .await
        .unwrap();

    assert_eq!(outcome.stock, 10);
    assert_eq!(stock_of(&pool, product).await, 10);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_movements").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_log").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_alerts").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn salida_may_leave_negative_stock(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let product = seed_product(&pool, "750101", "Mouse", 1, 0, Decimal::from(200)).await;
    let inventory = inventory_service(&pool, AlertPolicy::Append);

    let outcome = inventory
        .apply_movement(&pool, product, MovementKind::Salida, 3, user.id, "Venta", "Venta POS")
        .await
        .unwrap();

    assert_eq!(outcome.stock, -2);
    assert_eq!(stock_of(&pool, product).await, -2);
    let alert = outcome.alert.expect("negative stock raises an alert");
    assert_eq!(alert.message, "Stock bajo en Mouse. Stock actual: -2");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn crossing_the_minimum_raises_one_alert_and_restock_clears_it(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let product = seed_product(&pool, "750102", "Audífonos", 5, 3, Decimal::from(350)).await;
    let inventory = inventory_service(&pool, AlertPolicy::Append);

    let outcome = inventory
        .apply_movement(&pool, product, MovementKind::Salida, 2, user.id, "Venta", "Venta POS")
        .await
        .unwrap();

    let alert = outcome.alert.unwrap();
    assert_eq!(alert.message, "Stock bajo en Audífonos. Stock actual: 3");
    assert_eq!(alert.stock_at_creation, 3);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM inventory_alerts WHERE attended = false").await,
        1
    );

    let restock = inventory
        .apply_movement(&pool, product, MovementKind::Entrada, 10, user.id, "Compra", "Compra")
        .await
        .unwrap();
    assert_eq!(restock.cleared_alerts, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM inventory_alerts WHERE attended = false").await,
        0
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn refresh_policy_keeps_a_single_outstanding_alert(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let product = seed_product(&pool, "750103", "Memoria USB", 4, 3, Decimal::from(180)).await;
    let inventory = inventory_service(&pool, AlertPolicy::Refresh);

    for _ in 0..2 {
        inventory
            .apply_movement(&pool, product, MovementKind::Salida, 2, user.id, "Venta", "Venta POS")
            .await
            .unwrap();
    }

    assert_eq!(stock_of(&pool, product).await, 0);
    let messages: Vec<String> =
        sqlx::query_scalar("SELECT message FROM inventory_alerts WHERE attended = false")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(messages, vec!["Producto agotado: Memoria USB".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn unknown_product_leaves_ledger_untouched(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let inventory = inventory_service(&pool, AlertPolicy::Append);

    let err = inventory
        .apply_movement(&pool, 9999, MovementKind::Salida, 1, user.id, "Venta", "Venta POS")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ProductNotFound(9999)));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_movements").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_log").await, 0);
}
