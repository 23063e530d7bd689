//! HTTP request handlers for the Fabric Roll Tracking Platform

pub mod auth;
pub mod dispatch;
pub mod health;
pub mod inventory;
pub mod refdata;
pub mod scan;

pub use auth::*;
pub use dispatch::*;
pub use health::*;
pub use inventory::*;
pub use refdata::*;
pub use scan::*;
