//! Domain models for the Fabric Roll Tracking Platform

mod dispatch;
mod inventory;
mod refdata;
mod scan;
mod user;

pub use dispatch::*;
pub use inventory::*;
pub use refdata::*;
pub use scan::*;
pub use user::*;
