mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;

use caja_pos::{
    common::error::AppError,
    models::{
        cash_drawer::CloseDrawerRequest,
        inventory::MovementKind,
        sales::{LineItemRef, PaymentMethod, RegisterSaleRequest, SaleLineRequest},
    },
    services::alert_service::AlertPolicy,
};
use common::{
    cash_drawer_service, count, inventory_service, sale_service, seed_product, seed_user,
    stock_of, temp_invoice_dir, StubRenderer,
};

fn two_lines(first: i32, second: i32) -> RegisterSaleRequest {
    let line = |id: i32| SaleLineRequest {
        item_id: LineItemRef::Id(id),
        name: format!("Producto {}", id),
        price: Decimal::from(10),
        quantity: 1,
    };
    RegisterSaleRequest {
        items: vec![line(first), line(second)],
        total: Decimal::from(20),
        customer_name: None,
        customer_rtn: None,
        payment_method: PaymentMethod::Efectivo,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn concurrent_closes_only_one_wins(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let drawers = cash_drawer_service(&pool);
    drawers.open(&pool, user.id, Decimal::from(5000)).await.unwrap();

    let totals = CloseDrawerRequest {
        total_cash: Decimal::from(6000),
        total_card: Decimal::ZERO,
        total_transfer: Decimal::ZERO,
        wallet_tigo: Decimal::ZERO,
        wallet_claro: Decimal::ZERO,
        shortage: Decimal::ZERO,
    };
    let spawn_close = || {
        let drawers = drawers.clone();
        let pool = pool.clone();
        let totals = totals.clone();
        tokio::spawn(async move { drawers.close(&pool, &totals).await })
    };
    let (first, second) = tokio::join!(spawn_close(), spawn_close());
    let results = [first.unwrap(), second.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::NoOpenDrawer))));
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM cash_drawer WHERE state = 'cerrada'").await,
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn parallel_salidas_lose_no_updates(pool: PgPool) {
    let user_id = seed_user(&pool, "ana").await.id;
    let product = seed_product(&pool, "750300", "Cargador", 100, 0, Decimal::from(250)).await;
    let inventory = inventory_service(&pool, AlertPolicy::Append);

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let inventory = inventory.clone();
            let pool = pool.clone();
            tokio::spawn(async move {
                inventory
                    .apply_movement(
                        &pool,
                        product,
                        MovementKind::Salida,
                        1,
                        user_id,
                        "Ajuste",
                        "Ajuste",
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(stock_of(&pool, product).await, 50);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_movements").await, 50);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sales_with_crossed_line_order_do_not_deadlock(pool: PgPool) {
    let seller = seed_user(&pool, "ana").await;
    let a = seed_product(&pool, "750301", "Teclado", 1000, 0, Decimal::from(10)).await;
    let b = seed_product(&pool, "750302", "Memoria USB", 1000, 0, Decimal::from(10)).await;
    let dir = temp_invoice_dir();
    let sales = sale_service(&pool, Arc::new(StubRenderer), dir.clone());

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let sales = sales.clone();
            let seller = seller.clone();
            let request = if i % 2 == 0 { two_lines(a, b) } else { two_lines(b, a) };
            tokio::spawn(async move { sales.register_sale(&request, &seller).await })
        })
        .collect();

    for handle in handles {
        let receipt = handle.await.unwrap().unwrap();
        assert!(receipt.ok);
    }

    assert_eq!(stock_of(&pool, a).await, 960);
    assert_eq!(stock_of(&pool, b).await, 960);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM sales").await, 40);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM inventory_movements").await, 80);

    let _ = tokio::fs::remove_dir_all(dir).await;
}
