//! Shared types, errors, and configuration for Tabula.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management (statutory filing settings)

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, FilingConfig};
pub use error::{AppError, AppResult};
