// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AlertRepository, CashDrawerRepository, CustomerRepository, ExpenseRepository,
        ProductRepository, ReportRepository, SaleRepository, UserRepository,
    },
    services::{
        alert_service::{AlertPolicy, AlertService},
        auth::AuthService,
        cash_drawer_service::CashDrawerService,
        crm_service::CrmService,
        document_service::{CompanyProfile, FsInvoiceStore, GenpdfInvoiceRenderer, InvoiceService},
        finance_service::FinanceService,
        inventory_service::InventoryService,
        report_service::ReportService,
        sale_service::SaleService,
        user_service::UserService,
    },
};

/// Configuração lida do ambiente (.env).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    pub invoice_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub logo_path: PathBuf,
    pub invoice_qr_payload: Option<String>,
    pub company_name: String,
    pub cash_base_float: Decimal,
    pub business_utc_offset_hours: i32,
    pub daily_sales_goal: Decimal,
    pub alert_policy: AlertPolicy,
}

fn var_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000".to_string())?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_hours: var_or("TOKEN_TTL_HOURS", 12)?,
            invoice_dir: var_or("INVOICE_DIR", PathBuf::from("./facturas"))?,
            fonts_dir: var_or("FONTS_DIR", PathBuf::from("./fonts"))?,
            font_family: var_or("FONT_FAMILY", "Roboto".to_string())?,
            logo_path: var_or("LOGO_PATH", PathBuf::from("./logos/logo.png"))?,
            invoice_qr_payload: env::var("INVOICE_QR_PAYLOAD").ok().filter(|s| !s.is_empty()),
            company_name: var_or("COMPANY_NAME", "TECNOMART".to_string())?,
            cash_base_float: var_or("CASH_BASE_FLOAT", Decimal::from(5000))?,
            business_utc_offset_hours: var_or("BUSINESS_UTC_OFFSET_HOURS", -6)?,
            daily_sales_goal: var_or("DAILY_SALES_GOAL", Decimal::from(1500))?,
            alert_policy: var_or("ALERT_POLICY", AlertPolicy::Append)?,
        })
    }

    /// Fuso da loja, usado para classificar o turno no corte.
    pub fn business_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.business_utc_offset_hours * 3600)
            .with_context(|| format!("BUSINESS_UTC_OFFSET_HOURS fora do intervalo: {}", self.business_utc_offset_hours))
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub inventory_service: InventoryService,
    pub alert_service: AlertService,
    pub sale_service: SaleService,
    pub cash_drawer_service: CashDrawerService,
    pub report_service: ReportService,
    pub finance_service: FinanceService,
    pub crm_service: CrmService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let offset = config.business_offset()?;

        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let alert_repo = AlertRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let drawer_repo = CashDrawerRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());
        let expense_repo = ExpenseRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let user_service = UserService::new(user_repo, db_pool.clone());

        let alert_service = AlertService::new(alert_repo, config.alert_policy);
        let inventory_service = InventoryService::new(product_repo, alert_service.clone());

        let profile = CompanyProfile {
            name: config.company_name.clone(),
            qr_payload: config.invoice_qr_payload.clone(),
            ..CompanyProfile::default()
        };

        let invoice_service = InvoiceService::new(
            Arc::new(GenpdfInvoiceRenderer::new(
                config.fonts_dir.clone(),
                config.font_family.clone(),
                Some(config.logo_path.clone()),
            )),
            Arc::new(FsInvoiceStore::new(config.invoice_dir.clone())),
            profile,
            offset,
        );
        let sale_service = SaleService::new(
            db_pool.clone(),
            sale_repo,
            inventory_service.clone(),
            invoice_service,
        );

        let cash_drawer_service =
            CashDrawerService::new(drawer_repo, config.cash_base_float, offset);
        let report_service = ReportService::new(
            report_repo,
            config.daily_sales_goal,
            offset,
            config.fonts_dir.clone(),
            config.font_family.clone(),
        );
        let finance_service = FinanceService::new(expense_repo);
        let crm_service = CrmService::new(customer_repo);

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            user_service,
            inventory_service,
            alert_service,
            sale_service,
            cash_drawer_service,
            report_service,
            finance_service,
            crm_service,
        })
    }
}
