pub mod auth;
pub mod cash_drawer;
pub mod crm;
pub mod finance;
pub mod inventory;
pub mod reports;
pub mod sales;
