//! Invoice engine errors.

use thiserror::Error;

use crate::journal::JournalError;
use crate::store::StoreError;

use super::types::InvoiceStatus;

/// Errors raised by the invoice engine.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// General field validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invoice number does not match `LLDDDDDDDD`.
    #[error("Invalid invoice number: {0}")]
    InvalidNumber(String),

    /// Another invoice in the company already carries this number.
    #[error("Duplicate invoice number: {0}")]
    DuplicateNumber(String),

    /// `total != untaxed + tax`.
    #[error("Amount mismatch: total {total} != untaxed {untaxed} + tax {tax}")]
    AmountMismatch {
        /// Untaxed amount supplied.
        untaxed: i64,
        /// Tax amount supplied.
        tax: i64,
        /// Total amount supplied.
        total: i64,
    },

    /// A monetary field is negative.
    #[error("Negative amount: {0}")]
    NegativeAmount(String),

    /// Classification incompatible with the invoice type or amounts.
    #[error("Invalid tax classification: {0}")]
    InvalidClassification(String),

    /// Disallowed status transition.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },

    /// The invoice does not exist.
    #[error("Invoice not found: {0}")]
    NotFound(String),

    /// The operation requires a different status.
    #[error("Invalid invoice state: {0}")]
    InvalidState(String),

    /// Payment larger than the outstanding balance.
    #[error("Payment {requested} exceeds outstanding balance {outstanding}")]
    AmountExceedsBalance {
        /// Payment amount requested.
        requested: i64,
        /// Outstanding balance before this payment.
        outstanding: i64,
    },

    /// A journal operation performed on the invoice's behalf failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidNumber(_) => "INVALID_INVOICE_NUMBER",
            Self::DuplicateNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidClassification(_) => "INVALID_CLASSIFICATION",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::AmountExceedsBalance { .. } => "AMOUNT_EXCEEDS_BALANCE",
            Self::Journal(e) => e.error_code(),
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InvalidNumber(_)
            | Self::AmountMismatch { .. }
            | Self::NegativeAmount(_)
            | Self::InvalidClassification(_) => 400,
            Self::DuplicateNumber(_) => 409,
            Self::InvalidTransition { .. }
            | Self::InvalidState(_)
            | Self::AmountExceedsBalance { .. } => 422,
            Self::NotFound(_) => 404,
            Self::Journal(e) => e.http_status_code(),
            Self::Store(e) => e.http_status_code(),
        }
    }
}
