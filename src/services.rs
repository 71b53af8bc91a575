pub mod alert_service;
pub mod amount_words;
pub mod auth;
pub mod cash_drawer_service;
pub mod crm_service;
pub mod document_service;
pub mod finance_service;
pub mod inventory_service;
pub mod report_service;
pub mod sale_service;
pub mod shift;
pub mod user_service;
