pub mod catalog_service;
pub mod notification_service;

pub use catalog_service::CatalogService;
pub use notification_service::NotificationService;
