//! Business logic services for the Fabric Roll Tracking Platform

pub mod auth;
pub mod dispatch;
pub mod inventory;
pub mod label;
pub mod product_code;
pub mod refdata;
pub mod scan;

pub use auth::AuthService;
pub use dispatch::DispatchService;
pub use inventory::InventoryService;
pub use refdata::RefDataService;
pub use scan::ScanService;
