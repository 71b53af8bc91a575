// src/services/finance_service.rs

use crate::{
    common::error::AppError,
    db::ExpenseRepository,
    models::finance::{Expense, ExpensePayload},
};

#[derive(Clone)]
pub struct FinanceService {
    repo: ExpenseRepository,
}

impl FinanceService {
    pub fn new(repo: ExpenseRepository) -> Self {
        Self { repo }
    }

    pub async fn list_expenses(&self, days: u32) -> Result<Vec<Expense>, AppError> {
        self.repo.list_since(days).await
    }

    pub async fn create_expense(&self, payload: &ExpensePayload) -> Result<Expense, AppError> {
        let expense = self
            .repo
            .create(payload.description.trim(), payload.amount)
            .await?;
        tracing::info!(expense_id = expense.id, amount = %expense.amount, "Gasto registrado");
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        id: i32,
        payload: &ExpensePayload,
    ) -> Result<Expense, AppError> {
        self.repo
            .update(id, payload.description.trim(), payload.amount)
            .await
    }

    pub async fn delete_expense(&self, id: i32) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}
