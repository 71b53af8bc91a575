// src/services/sale_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{
        sale_repo::{NewSale, NewSaleItem},
        SaleRepository,
    },
    models::{
        auth::User,
        inventory::MovementKind,
        sales::{LineTarget, RegisterSaleRequest, Sale, SaleLineRequest, SaleReceipt},
    },
    services::{document_service::InvoiceService, inventory_service::InventoryService},
};

pub const SALE_REASON: &str = "Venta";
pub const SALE_LOG_DETAIL: &str = "Venta POS";

/// Resolve o alvo de cada linha antes de abrir a transação.
pub fn resolve_lines(items: &[SaleLineRequest]) -> Result<Vec<LineTarget>, AppError> {
    items
        .iter()
        .map(|line| {
            line.item_id.target().ok_or_else(|| {
                AppError::InvalidInput(format!("artículo inválido: {:?}", line.item_id))
            })
        })
        .collect()
}

pub fn lines_total(items: &[SaleLineRequest]) -> Decimal {
    items.iter().map(SaleLineRequest::line_total).sum()
}

#[derive(Clone)]
pub struct SaleService {
    pool: PgPool,
    sale_repo: SaleRepository,
    inventory_service: InventoryService,
    invoice_service: InvoiceService,
}

impl SaleService {
    pub fn new(
        pool: PgPool,
        sale_repo: SaleRepository,
        inventory_service: InventoryService,
        invoice_service: InvoiceService,
    ) -> Self {
        Self { pool, sale_repo, inventory_service, invoice_service }
    }

    /// Registra a venda e baixa o estoque numa transação; depois gera a fatura.
    ///
    /// Se a fatura falhar, a venda continua gravada como PENDIENTE e o erro
    /// leva o número da fatura para nova tentativa.
    pub async fn register_sale(
        &self,
        request: &RegisterSaleRequest,
        seller: &User,
    ) -> Result<SaleReceipt, AppError> {
        let targets = resolve_lines(&request.items)?;

        let computed = lines_total(&request.items);
        if computed != request.total {
            tracing::warn!(
                total = %request.total,
                computed = %computed,
                "Total informado difere da soma das linhas"
            );
        }

        let mut tx = self.pool.begin().await?;

        // 0. Trava os produtos da venda em ordem de id (evita deadlock entre caixas)
        let product_ids: Vec<i32> = targets
            .iter()
            .filter_map(|target| match target {
                LineTarget::Product(id) => Some(*id),
                LineTarget::Service(_) => None,
            })
            .collect();
        self.inventory_service
            .lock_products(&mut *tx, &product_ids)
            .await?;

        // 1. Cabeçalho (gera o número da fatura)
        let sale = self
            .sale_repo
            .insert_sale(
                &mut *tx,
                &NewSale {
                    user_id: seller.id,
                    payment_method: request.payment_method,
                    total: request.total,
                    customer_name: request.customer_name.as_deref(),
                    customer_rtn: request.customer_rtn.as_deref(),
                    seller_name: &seller.full_name,
                },
            )
            .await?;

        // 2. Linhas + baixa de estoque (serviços não movimentam estoque)
        let mut items = Vec::with_capacity(request.items.len());
        for (line, target) in request.items.iter().zip(&targets) {
            let (product_id, service_code) = match target {
                LineTarget::Product(id) => {
                    self.inventory_service
                        .apply_movement(
                            &mut *tx,
                            *id,
                            MovementKind::Salida,
                            line.quantity,
                            seller.id,
                            SALE_REASON,
                            SALE_LOG_DETAIL,
                        )
                        .await?;
                    (Some(*id), None)
                }
                LineTarget::Service(code) => (None, Some(code.as_str())),
            };

            let item = self
                .sale_repo
                .insert_item(
                    &mut *tx,
                    sale.id,
                    &NewSaleItem {
                        product_id,
                        service_code,
                        description: &line.name,
                        quantity: line.quantity,
                        unit_price: line.price,
                        line_total: line.line_total(),
                    },
                )
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            invoice_number = sale.invoice_number,
            lines = items.len(),
            total = %sale.total,
            "Venta registrada"
        );

        // 3. Fatura (fora da transação)
        let file = self.invoice_service.generate(&sale, &items).await?;
        self.sale_repo.mark_invoice_generated(sale.id, &file).await?;

        Ok(SaleReceipt {
            ok: true,
            message: "Venta registrada y factura generada".to_string(),
            invoice_number: sale.invoice_number,
            file,
        })
    }

    /// Gera de novo a fatura a partir das linhas gravadas.
    pub async fn regenerate_invoice(&self, invoice_number: i64) -> Result<SaleReceipt, AppError> {
        let sale = self.find_sale(invoice_number).await?;
        let items = self.sale_repo.list_items(sale.id).await?;

        let file = self.invoice_service.generate(&sale, &items).await?;
        self.sale_repo.mark_invoice_generated(sale.id, &file).await?;

        tracing::info!(invoice_number, "Factura regenerada");

        Ok(SaleReceipt {
            ok: true,
            message: "Factura generada".to_string(),
            invoice_number,
            file,
        })
    }

    /// PDF da fatura; se o arquivo sumiu, é gerado de novo.
    pub async fn invoice_pdf(&self, invoice_number: i64) -> Result<Vec<u8>, AppError> {
        if let Some(bytes) = self.invoice_service.load(invoice_number).await? {
            return Ok(bytes);
        }

        self.regenerate_invoice(invoice_number).await?;
        self.invoice_service
            .load(invoice_number)
            .await?
            .ok_or(AppError::SaleNotFound(invoice_number))
    }

    pub async fn find_sale(&self, invoice_number: i64) -> Result<Sale, AppError> {
        self.sale_repo
            .find_by_invoice(invoice_number)
            .await?
            .ok_or(AppError::SaleNotFound(invoice_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sales::LineItemRef;

    fn line(item_id: LineItemRef, price: i64, quantity: i32) -> SaleLineRequest {
        SaleLineRequest {
            item_id,
            name: "Item".into(),
            price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn resolves_products_and_services() {
        let items = vec![
            line(LineItemRef::Id(1), 100, 2),
            line(LineItemRef::Code("S3".into()), 50, 1),
            line(LineItemRef::Code("2".into()), 10, 3),
        ];
        let targets = resolve_lines(&items).unwrap();
        assert_eq!(
            targets,
            vec![
                LineTarget::Product(1),
                LineTarget::Service("S3".into()),
                LineTarget::Product(2)
            ]
        );
        assert_eq!(lines_total(&items), Decimal::from(280));
    }

    #[test]
    fn rejects_unknown_line_reference() {
        let items = vec![line(LineItemRef::Code("X9".into()), 1, 1)];
        assert!(matches!(resolve_lines(&items), Err(AppError::InvalidInput(_))));
    }
}
