// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::{I18nStore, DEFAULT_LANG};
use crate::middleware::i18n::Locale;

// Erros de domínio e infraestrutura, agrupados em
// validação, não encontrado, conflito, armazenamento e autenticação.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    // --- Não encontrado ---
    #[error("Produto {0} não encontrado")]
    ProductNotFound(i32),

    #[error("Código de barras {0} não cadastrado")]
    BarcodeNotFound(String),

    #[error("Venda {0} não encontrada")]
    SaleNotFound(i64),

    #[error("Alerta {0} não encontrado")]
    AlertNotFound(i32),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Gasto {0} não encontrado")]
    ExpenseNotFound(i32),

    #[error("Cliente {0} não encontrado")]
    CustomerNotFound(i32),

    // --- Conflito ---
    #[error("Código de barras {0} já existe")]
    BarcodeAlreadyExists(String),

    #[error("Usuário {0} já existe")]
    UsernameAlreadyExists(String),

    #[error("Não há caja aberta")]
    NoOpenDrawer,

    #[error("Produto com vendas registradas")]
    ProductHasSales,

    // --- Autenticação / autorização ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão ausente: {0}")]
    MissingPermission(String),

    // --- Armazenamento / interno ---
    #[error("Falha ao gerar a fatura {invoice_number}: {reason}")]
    InvoiceGenerationFailed { invoice_number: i64, reason: String },

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,

            AppError::ProductNotFound(_)
            | AppError::BarcodeNotFound(_)
            | AppError::SaleNotFound(_)
            | AppError::AlertNotFound(_)
            | AppError::UserNotFound
            | AppError::ExpenseNotFound(_)
            | AppError::CustomerNotFound(_) => StatusCode::NOT_FOUND,

            AppError::BarcodeAlreadyExists(_)
            | AppError::UsernameAlreadyExists(_)
            | AppError::NoOpenDrawer
            | AppError::ProductHasSales => StatusCode::CONFLICT,

            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::MissingPermission(_) => StatusCode::FORBIDDEN,

            AppError::InvoiceGenerationFailed { .. }
            | AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Chave do catálogo + argumento interpolado
    fn message_key(&self) -> (&'static str, Option<String>) {
        match self {
            AppError::ValidationError(_) => ("validation", None),
            AppError::InvalidInput(msg) => ("invalid_input", Some(msg.clone())),
            AppError::ProductNotFound(id) => ("product_not_found", Some(id.to_string())),
            AppError::BarcodeNotFound(code) => ("barcode_not_found", Some(code.clone())),
            AppError::SaleNotFound(n) => ("sale_not_found", Some(n.to_string())),
            AppError::AlertNotFound(id) => ("alert_not_found", Some(id.to_string())),
            AppError::UserNotFound => ("user_not_found", None),
            AppError::ExpenseNotFound(id) => ("expense_not_found", Some(id.to_string())),
            AppError::CustomerNotFound(id) => ("customer_not_found", Some(id.to_string())),
            AppError::BarcodeAlreadyExists(code) => ("barcode_exists", Some(code.clone())),
            AppError::UsernameAlreadyExists(name) => ("username_exists", Some(name.clone())),
            AppError::NoOpenDrawer => ("no_open_drawer", None),
            AppError::ProductHasSales => ("product_has_sales", None),
            AppError::InvalidCredentials => ("invalid_credentials", None),
            AppError::InvalidToken => ("invalid_token", None),
            AppError::MissingPermission(p) => ("missing_permission", Some(p.clone())),
            AppError::InvoiceGenerationFailed { invoice_number, .. } => {
                ("invoice_failed", Some(invoice_number.to_string()))
            }
            _ => ("internal", None),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::InvoiceGenerationFailed { invoice_number, .. } => {
                Some(json!({ "invoiceNumber": invoice_number, "retryable": true }))
            }
            _ => None,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe técnico vai para o log, nunca para o cliente.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, arg) = self.message_key();
        ApiError {
            status,
            error: i18n.translate(&locale.0, key, arg.as_deref()),
            details: self.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "ok": false, "error": self.error });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Usado pelos middlewares, que não têm o Locale em mãos.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale(DEFAULT_LANG.to_string()), &I18nStore::new())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es() -> Locale {
        Locale("es".into())
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ProductNotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NoOpenDrawer.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::ProductHasSales.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::MissingPermission("usuarios.gestionar".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        let api = err.to_api_error(&es(), &I18nStore::new());
        assert_eq!(api.error, "Ocurrió un error inesperado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn invoice_failure_carries_the_invoice_number() {
        let err = AppError::InvoiceGenerationFailed {
            invoice_number: 1042,
            reason: "disk full".into(),
        };
        let api = err.to_api_error(&es(), &I18nStore::new());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.error.contains("1042"));
        assert_eq!(api.details.unwrap()["invoiceNumber"], 1042);
    }
}
