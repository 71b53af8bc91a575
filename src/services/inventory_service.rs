// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, PgConnection, Postgres};

use crate::{
    common::error::AppError,
    db::{product_repo::NewProduct, ProductRepository},
    models::inventory::{
        CreateProductPayload, InventoryMovement, MovementKind, MovementOutcome, Product,
        ProductListing, ServiceItem,
    },
    services::alert_service::AlertService,
};

pub const INITIAL_STOCK_REASON: &str = "Ingreso inicial";

fn sorted_unique(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    alert_service: AlertService,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository, alert_service: AlertService) -> Self {
        Self { product_repo, alert_service }
    }

    // --- LIVRO-RAZÃO ---

    /// Aplica uma entrada ou saída de estoque numa transação só.
    ///
    /// Recebendo uma transação já aberta (venda), roda dentro de um savepoint dela.
    /// Saída não tem piso: o estoque pode ficar negativo.
    pub async fn apply_movement<'e, A>(
        &self,
        conn: A,
        product_id: i32,
        kind: MovementKind,
        quantity: i32,
        user_id: i32,
        reason: &str,
        detail: &str,
    ) -> Result<MovementOutcome, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(format!(
                "cantidad inválida: {}",
                quantity
            )));
        }

        let mut tx = conn.begin().await?;

        // 1. Trava a linha do produto (serializa leitura-alteração-escrita)
        let product = self
            .product_repo
            .lock_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        // 2. Histórico
        let movement = self
            .product_repo
            .record_movement(&mut *tx, product_id, kind, quantity, user_id, reason)
            .await?;
        self.product_repo
            .record_log(&mut *tx, product_id, user_id, kind, quantity, detail)
            .await?;

        // 3. Saldo
        let updated = self
            .product_repo
            .apply_stock_delta(&mut *tx, product_id, kind.signed(quantity))
            .await?;

        // 4. Alertas, ainda dentro da transação
        let mut alert = None;
        let mut cleared_alerts = 0;
        if updated.stock <= updated.stock_minimum {
            alert = self
                .alert_service
                .raise_if_low(
                    &mut *tx,
                    product_id,
                    updated.stock,
                    updated.stock_minimum,
                    &product.name,
                )
                .await?;
        } else if kind == MovementKind::Entrada {
            cleared_alerts = self
                .alert_service
                .clear_outstanding(&mut *tx, product_id)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            product_id,
            ?kind,
            quantity,
            stock = updated.stock,
            "Movimentação de estoque aplicada"
        );

        Ok(MovementOutcome {
            movement,
            stock: updated.stock,
            stock_minimum: updated.stock_minimum,
            alert,
            cleared_alerts,
        })
    }

    /// Trava de uma vez todos os produtos de uma venda, sempre na mesma ordem,
    /// para que vendas concorrentes com os mesmos itens se enfileirem.
    pub async fn lock_products(
        &self,
        conn: &mut PgConnection,
        product_ids: &[i32],
    ) -> Result<(), AppError> {
        let ids = sorted_unique(product_ids);
        if ids.is_empty() {
            return Ok(());
        }

        let locked = self.product_repo.lock_many_for_update(&mut *conn, &ids).await?;
        match ids.iter().find(|id| !locked.contains(id)) {
            Some(missing) => Err(AppError::ProductNotFound(*missing)),
            None => Ok(()),
        }
    }

    // --- CADASTRO ---

    pub async fn create_product<'e, A>(
        &self,
        conn: A,
        payload: &CreateProductPayload,
        user_id: i32,
    ) -> Result<Product, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        let new = NewProduct {
            barcode: payload.barcode.trim(),
            name: payload.name.trim(),
            description: &payload.description,
            category_id: payload.category_id,
            stock: payload.stock,
            stock_minimum: payload.stock_minimum,
            price: payload.price,
            wholesale_price: payload.wholesale_price,
        };
        let product = self.product_repo.create_product(&mut *tx, &new).await?;

        // O saldo inicial já está na linha; só o histórico é gravado
        if product.stock > 0 {
            self.product_repo
                .record_movement(
                    &mut *tx,
                    product.id,
                    MovementKind::Entrada,
                    product.stock,
                    user_id,
                    INITIAL_STOCK_REASON,
                )
                .await?;
            self.product_repo
                .record_log(
                    &mut *tx,
                    product.id,
                    user_id,
                    MovementKind::Entrada,
                    product.stock,
                    INITIAL_STOCK_REASON,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(product_id = product.id, barcode = %product.barcode, "Produto criado");
        Ok(product)
    }

    pub async fn update_price(
        &self,
        product_id: i32,
        price: Decimal,
        wholesale_price: Decimal,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update_price(product_id, price, wholesale_price)
            .await
    }

    pub async fn update_product(
        &self,
        product_id: i32,
        barcode: &str,
        name: &str,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update_identity(product_id, barcode.trim(), name.trim())
            .await
    }

    /// Exclusão definitiva; produtos com vendas não podem ser apagados.
    pub async fn delete_product<'e, A>(&self, conn: A, product_id: i32) -> Result<(), AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        self.product_repo
            .lock_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        if self.product_repo.has_sales(&mut *tx, product_id).await? {
            return Err(AppError::ProductHasSales);
        }

        self.product_repo.delete_dependencies(&mut *tx, product_id).await?;
        self.product_repo.delete_product(&mut *tx, product_id).await?;

        tx.commit().await?;

        tracing::info!(product_id, "Produto excluído");
        Ok(())
    }

    // --- CONSULTAS ---

    pub async fn find_by_barcode(&self, barcode: &str) -> Result<Product, AppError> {
        self.product_repo
            .find_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| AppError::BarcodeNotFound(barcode.trim().to_string()))
    }

    pub async fn list_products(&self) -> Result<Vec<ProductListing>, AppError> {
        let rows = self.product_repo.list_with_category().await?;
        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    pub async fn movement_history(
        &self,
        product_id: i32,
    ) -> Result<Vec<InventoryMovement>, AppError> {
        self.product_repo.list_movements(product_id).await
    }

    pub async fn suggest_services(&self, text: &str) -> Result<Vec<ServiceItem>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.product_repo.suggest_services(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_order_is_ascending_without_repeats() {
        assert_eq!(sorted_unique(&[7, 3, 7, 1, 3]), vec![1, 3, 7]);
        assert!(sorted_unique(&[]).is_empty());
    }
}
