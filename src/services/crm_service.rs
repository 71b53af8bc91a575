// src/services/crm_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::crm::{CreateCreditCustomerPayload, Customer},
};

// Crédito (fiado) dos clientes
#[derive(Clone)]
pub struct CrmService {
    repo: CustomerRepository,
}

impl CrmService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo }
    }

    pub async fn list_credit_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.repo.list_with_credit().await
    }

    pub async fn create_credit_customer(
        &self,
        payload: &CreateCreditCustomerPayload,
    ) -> Result<Customer, AppError> {
        let phone = payload
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let customer = self
            .repo
            .create_with_credit(payload.name.trim(), phone, payload.amount)
            .await?;
        tracing::info!(customer_id = customer.id, "Cliente com crédito criado");
        Ok(customer)
    }

    pub async fn assign_credit(&self, id: i32, amount: Decimal) -> Result<Customer, AppError> {
        self.repo.assign_credit(id, amount).await
    }

    pub async fn adjust_debt(&self, id: i32, delta: Decimal) -> Result<Customer, AppError> {
        let customer = self.repo.adjust_debt(id, delta).await?;
        tracing::info!(customer_id = id, delta = %delta, debt = %customer.debt_amount, "Dívida ajustada");
        Ok(customer)
    }

    pub async fn remove_credit(&self, id: i32) -> Result<Customer, AppError> {
        self.repo.remove_credit(id).await
    }
}
