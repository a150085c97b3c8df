//! alphaloop command line
//!
//! Exposes configuration and CLI modules for integration testing

pub mod cli;
pub mod config;
pub mod errors;

pub use config::AppConfig;
pub use errors::AppError;
