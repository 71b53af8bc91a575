// src/services/alert_service.rs

use std::{fmt, str::FromStr};

use sqlx::PgConnection;

use crate::{
    common::error::AppError,
    db::AlertRepository,
    models::inventory::{Alert, AlertWithProduct},
};

/// O que fazer quando já existe alerta pendente para o produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPolicy {
    /// Sempre grava uma nova linha.
    Append,
    /// Atualiza o alerta pendente em vez de duplicar.
    Refresh,
}

impl FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Ok(AlertPolicy::Append),
            "refresh" => Ok(AlertPolicy::Refresh),
            other => Err(format!("política de alerta desconhecida: {}", other)),
        }
    }
}

impl fmt::Display for AlertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPolicy::Append => write!(f, "append"),
            AlertPolicy::Refresh => write!(f, "refresh"),
        }
    }
}

/// Mensagem de alerta para o saldo, ou `None` se o estoque está acima do mínimo.
pub fn low_stock_message(product_name: &str, stock: i32, stock_minimum: i32) -> Option<String> {
    if stock == 0 {
        Some(format!("Producto agotado: {}", product_name))
    } else if stock <= stock_minimum {
        Some(format!("Stock bajo en {}. Stock actual: {}", product_name, stock))
    } else {
        None
    }
}

#[derive(Clone)]
pub struct AlertService {
    alert_repo: AlertRepository,
    policy: AlertPolicy,
}

impl AlertService {
    pub fn new(alert_repo: AlertRepository, policy: AlertPolicy) -> Self {
        Self { alert_repo, policy }
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    /// Chamado pelo livro-razão, dentro da transação da movimentação.
    pub async fn raise_if_low(
        &self,
        conn: &mut PgConnection,
        product_id: i32,
        stock: i32,
        stock_minimum: i32,
        product_name: &str,
    ) -> Result<Option<Alert>, AppError> {
        let Some(message) = low_stock_message(product_name, stock, stock_minimum) else {
            return Ok(None);
        };

        let alert = match self.policy {
            AlertPolicy::Append => {
                self.alert_repo
                    .insert(&mut *conn, product_id, stock, &message)
                    .await?
            }
            AlertPolicy::Refresh => {
                match self.alert_repo.latest_outstanding(&mut *conn, product_id).await? {
                    Some(pending) => {
                        self.alert_repo
                            .refresh(&mut *conn, pending.id, stock, &message)
                            .await?
                    }
                    None => {
                        self.alert_repo
                            .insert(&mut *conn, product_id, stock, &message)
                            .await?
                    }
                }
            }
        };

        tracing::info!(product_id, stock, alert_id = alert.id, "Alerta de estoque registrado");
        Ok(Some(alert))
    }

    pub async fn clear_outstanding(
        &self,
        conn: &mut PgConnection,
        product_id: i32,
    ) -> Result<u64, AppError> {
        let cleared = self
            .alert_repo
            .attend_all_for_product(&mut *conn, product_id)
            .await?;

        if cleared > 0 {
            tracing::info!(product_id, cleared, "Alertas atendidos pela reposição");
        }
        Ok(cleared)
    }

    pub async fn mark_attended(&self, alert_id: i32) -> Result<Alert, AppError> {
        self.alert_repo.mark_attended(alert_id).await
    }

    pub async fn list_outstanding(&self) -> Result<Vec<AlertWithProduct>, AppError> {
        self.alert_repo.list_outstanding().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wording_follows_stock_level() {
        assert_eq!(
            low_stock_message("Cable HDMI", 0, 3).as_deref(),
            Some("Producto agotado: Cable HDMI")
        );
        assert_eq!(
            low_stock_message("Cable HDMI", 2, 3).as_deref(),
            Some("Stock bajo en Cable HDMI. Stock actual: 2")
        );
        assert_eq!(
            low_stock_message("Cable HDMI", 3, 3).as_deref(),
            Some("Stock bajo en Cable HDMI. Stock actual: 3")
        );
        assert_eq!(low_stock_message("Cable HDMI", 4, 3), None);
    }

    #[test]
    fn negative_stock_is_low_not_sold_out() {
        assert_eq!(
            low_stock_message("Mouse", -1, 0).as_deref(),
            Some("Stock bajo en Mouse. Stock actual: -1")
        );
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("append".parse::<AlertPolicy>(), Ok(AlertPolicy::Append));
        assert_eq!("REFRESH".parse::<AlertPolicy>(), Ok(AlertPolicy::Refresh));
        assert!("upsert".parse::<AlertPolicy>().is_err());
        assert_eq!(AlertPolicy::Refresh.to_string(), "refresh");
    }
}
