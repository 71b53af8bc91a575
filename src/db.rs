pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod alert_repo;
pub use alert_repo::AlertRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod cash_drawer_repo;
pub use cash_drawer_repo::CashDrawerRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
