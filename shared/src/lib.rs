//! Shared types and models for the Fabric Roll Tracking Platform
//!
//! This crate contains types shared between the backend server and any
//! other components of the system (label printers, warehouse tooling).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
