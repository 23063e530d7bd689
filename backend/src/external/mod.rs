//! External service integrations

pub mod qr;

pub use qr::QrClient;
