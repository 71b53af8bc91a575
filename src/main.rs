//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use caja_pos::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: RUST_LOG manda, "info" por padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health))
        .route("/test", get(handlers::health::db_time));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/me", get(handlers::auth::get_me))
        .route("/permisos", get(handlers::auth::my_permissions))
        .route("/crear", post(handlers::users::create_user))
        .route("/asignar-permisos", post(handlers::users::assign_permissions))
        .route("/{id}", axum::routing::delete(handlers::users::delete_user))
        .route("/{id}/estado", patch(handlers::users::set_user_active))
        .route("/{id}/permisos", get(handlers::users::user_permissions));

    let inventory_routes = Router::new()
        .route(
            "/productos",
            get(handlers::inventory::list_products).post(handlers::inventory::create_product),
        )
        .route(
            "/productos/{id}",
            patch(handlers::inventory::update_product).delete(handlers::inventory::delete_product),
        )
        .route("/precio/{id}", patch(handlers::inventory::update_price))
        .route("/movimientos", get(handlers::inventory::movement_history))
        .route("/entrada", post(handlers::inventory::stock_in))
        .route("/salida", post(handlers::inventory::stock_out))
        .route("/alertas", get(handlers::inventory::list_alerts))
        .route("/alertas/{id}/atender", patch(handlers::inventory::attend_alert));

    let sale_routes = Router::new()
        .route("/registrar", post(handlers::sales::register_sale))
        .route(
            "/{invoice_number}/factura",
            get(handlers::sales::download_invoice).post(handlers::sales::regenerate_invoice),
        );

    let drawer_routes = Router::new()
        .route("/abrir", post(handlers::cash_drawer::open_drawer))
        .route("/cerrar", post(handlers::cash_drawer::close_drawer))
        .route("/abierta", get(handlers::cash_drawer::current_drawer))
        .route("/ultimo-corte-info", get(handlers::cash_drawer::last_closing));

    let report_routes = Router::new()
        .route("/turnos", get(handlers::reports::shift_report))
        .route("/general", get(handlers::reports::general_report))
        .route("/general/pdf", get(handlers::reports::general_report_pdf))
        .route(
            "/gastos",
            get(handlers::finance::list_expenses).post(handlers::finance::create_expense),
        );

    let expense_routes = Router::new()
        .route("/editar/{id}", put(handlers::finance::update_expense))
        .route("/eliminar/{id}", axum::routing::delete(handlers::finance::delete_expense));

    let customer_routes = Router::new()
        .route(
            "/credito",
            get(handlers::crm::list_credit_customers).post(handlers::crm::create_credit_customer),
        )
        .route("/{id}/credito", put(handlers::crm::assign_credit))
        .route("/{id}/deuda", put(handlers::crm::adjust_debt))
        .route("/{id}/quitar-credito", put(handlers::crm::remove_credit));

    // Tudo abaixo exige token
    let protected_routes = Router::new()
        .route("/productos/buscar", get(handlers::inventory::find_by_barcode))
        .route("/servicios/sugerencias", get(handlers::inventory::suggest_services))
        .route("/permisos", get(handlers::users::list_permissions))
        .nest("/usuarios", user_routes)
        .nest("/inventario", inventory_routes)
        .nest("/ventas", sale_routes)
        .nest("/caja", drawer_routes)
        .nest("/reportes", report_routes)
        .nest("/gastos", expense_routes)
        .nest("/clientes", customer_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
