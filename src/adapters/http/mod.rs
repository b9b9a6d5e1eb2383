pub mod catalog_service;
pub mod notification_service;

pub use catalog_service::CatalogService as HttpCatalogService;
pub use notification_service::NotificationService as HttpNotificationService;
