//! Core business logic for Tabula.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; side effects go through the [`store::CompanyScopedStore`] port.
//!
//! # Modules
//!
//! - `account` - Chart of accounts registry
//! - `journal` - Double-entry journal engine
//! - `invoice` - AR/AP invoice lifecycle engine
//! - `fiscal` - Statutory filing periods (bi-months)
//! - `reports` - Read-only ledger projections
//! - `statutory` - VAT filing forms and the government media file
//! - `store` - Data-store port consumed by the engines

pub mod account;
pub mod fiscal;
pub mod invoice;
pub mod journal;
pub mod reports;
pub mod statutory;
pub mod store;
