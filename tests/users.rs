mod common;

use sqlx::PgPool;

use caja_pos::{common::error::AppError, db::UserRepository, services::user_service::UserService};
use common::{count, seed_user};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn assigning_permissions_replaces_the_set(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let users = UserService::new(UserRepository::new(pool.clone()), pool.clone());

    users
        .assign_permissions(user.id, &["caja.operar".into(), "ventas.registrar".into()])
        .await
        .unwrap();
    users
        .assign_permissions(user.id, &["reportes.ver".into()])
        .await
        .unwrap();

    assert_eq!(users.permissions_of(user.id).await.unwrap(), vec!["reportes.ver".to_string()]);
    assert!(users.has_permission(user.id, "reportes.ver").await.unwrap());
    assert!(!users.has_permission(user.id, "caja.operar").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn unknown_permission_keeps_previous_grants(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let users = UserService::new(UserRepository::new(pool.clone()), pool.clone());
    users
        .assign_permissions(user.id, &["caja.operar".into()])
        .await
        .unwrap();

    let err = users
        .assign_permissions(user.id, &["caja.operar".into(), "naves.pilotar".into()])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(users.permissions_of(user.id).await.unwrap(), vec!["caja.operar".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn deleting_a_user_removes_grants(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let users = UserService::new(UserRepository::new(pool.clone()), pool.clone());
    users
        .assign_permissions(user.id, &["usuarios.gestionar".into()])
        .await
        .unwrap();

    users.delete_user(user.id).await.unwrap();

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM user_permissions").await, 0);
    assert!(matches!(
        users.delete_user(user.id).await.unwrap_err(),
        AppError::UserNotFound
    ));
}
