pub mod catalog_service;
pub mod loan_repository;
pub mod notification_service;

pub use catalog_service::CatalogService;
pub use loan_repository::LoanRepository;
pub use notification_service::NotificationService;
