// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::my_permissions,

        // --- Usuarios ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::list_permissions,
        handlers::users::assign_permissions,

        // --- Inventario ---
        handlers::inventory::find_by_barcode,
        handlers::inventory::list_products,
        handlers::inventory::create_product,
        handlers::inventory::stock_in,
        handlers::inventory::stock_out,
        handlers::inventory::list_alerts,
        handlers::inventory::suggest_services,

        // --- Ventas ---
        handlers::sales::register_sale,
        handlers::sales::download_invoice,

        // --- Caja ---
        handlers::cash_drawer::open_drawer,
        handlers::cash_drawer::close_drawer,
        handlers::cash_drawer::current_drawer,
        handlers::cash_drawer::last_closing,

        // --- Reportes ---
        handlers::reports::shift_report,
        handlers::reports::general_report,

        // --- Gastos ---
        handlers::finance::list_expenses,
        handlers::finance::create_expense,

        // --- Clientes ---
        handlers::crm::list_credit_customers,
        handlers::crm::create_credit_customer,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::UserProfile,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::SetActivePayload,
            models::auth::AssignPermissionsPayload,
            models::auth::Permission,

            // --- Inventory ---
            models::inventory::MovementKind,
            models::inventory::Product,
            models::inventory::StockLevel,
            models::inventory::ProductListing,
            models::inventory::InventoryMovement,
            models::inventory::InventoryLogEntry,
            models::inventory::Alert,
            models::inventory::AlertWithProduct,
            models::inventory::ServiceItem,
            models::inventory::MovementOutcome,
            models::inventory::CreateProductPayload,
            models::inventory::UpdatePricePayload,
            models::inventory::UpdateProductPayload,
            models::inventory::StockMovementPayload,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::InvoiceStatus,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::LineItemRef,
            models::sales::SaleLineRequest,
            models::sales::RegisterSaleRequest,
            models::sales::SaleReceipt,

            // --- Cash drawer ---
            models::cash_drawer::DrawerState,
            models::cash_drawer::CashDrawer,
            models::cash_drawer::ClosingInfo,
            models::cash_drawer::OpenDrawerRequest,
            models::cash_drawer::CloseDrawerRequest,
            models::cash_drawer::Settlement,

            // --- Reports ---
            models::reports::ShiftReportRow,
            models::reports::DailySummary,
            models::reports::GeneralReport,

            // --- Finance ---
            models::finance::Expense,
            models::finance::ExpensePayload,

            // --- CRM ---
            models::crm::Customer,
            models::crm::CreateCreditCustomerPayload,
            models::crm::CreditAmountPayload,
            models::crm::DebtAdjustmentPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão"),
        (name = "Usuarios", description = "Usuários e permissões"),
        (name = "Inventario", description = "Produtos, livro de estoque e alertas"),
        (name = "Servicios", description = "Catálogo de serviços"),
        (name = "Ventas", description = "Vendas e faturas"),
        (name = "Caja", description = "Abertura e corte de caja"),
        (name = "Reportes", description = "Relatórios por turno e gerais"),
        (name = "Gastos", description = "Despesas do dia a dia"),
        (name = "Clientes", description = "Crédito (fiado) de clientes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_sale_and_drawer_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/ventas/registrar"));
        assert!(doc.paths.paths.contains_key("/api/caja/cerrar"));
        assert!(doc.paths.paths.contains_key("/api/ventas/{invoice_number}/factura"));
    }
}
