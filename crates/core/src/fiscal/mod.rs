//! Statutory filing periods.

pub mod period;

pub use period::{BiMonth, FiscalError};
