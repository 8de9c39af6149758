//! Journal engine errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by the journal engine.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Fewer than two lines supplied.
    #[error("A journal entry requires at least 2 lines")]
    InsufficientLines,

    /// A line is malformed (both sides set, both zero, or a negative amount).
    #[error("Invalid line: {0}")]
    InvalidLine(String),

    /// A line references an account that does not exist in this company.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Debit and credit totals differ.
    #[error("Entry does not balance: debits {debit}, credits {credit}")]
    UnbalancedEntry {
        /// Sum of all debit amounts.
        debit: Decimal,
        /// Sum of all credit amounts.
        credit: Decimal,
    },

    /// The entry is already posted.
    #[error("Journal entry is already posted")]
    AlreadyPosted,

    /// The operation requires a posted entry.
    #[error("Journal entry is not posted")]
    NotPosted,

    /// Posted entries cannot be edited or deleted.
    #[error("Cannot modify a posted journal entry")]
    CannotModifyPosted,

    /// Voided entries are terminal.
    #[error("Cannot modify a voided journal entry")]
    CannotModifyVoided,

    /// The entry does not exist.
    #[error("Journal entry not found: {0}")]
    NotFound(String),

    /// A concurrent writer changed the entry's status first.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::InvalidLine(_) => "INVALID_LINE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AlreadyPosted => "ALREADY_POSTED",
            Self::NotPosted => "NOT_POSTED",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyVoided => "CANNOT_MODIFY_VOIDED",
            Self::NotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidLine(_) | Self::InsufficientLines => 400,
            Self::AccountNotFound(_) | Self::NotFound(_) => 404,
            Self::UnbalancedEntry { .. }
            | Self::AlreadyPosted
            | Self::NotPosted
            | Self::CannotModifyPosted
            | Self::CannotModifyVoided => 422,
            Self::Conflict(_) => 409,
            Self::Store(e) => e.http_status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbalanced_entry_message() {
        let err = JournalError::UnbalancedEntry {
            debit: dec!(100),
            credit: dec!(90),
        };
        assert_eq!(
            err.to_string(),
            "Entry does not balance: debits 100, credits 90"
        );
        assert_eq!(err.error_code(), "UNBALANCED_ENTRY");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_store_error_passthrough_status() {
        let err = JournalError::Store(StoreError::Unavailable("down".into()));
        assert_eq!(err.http_status_code(), 503);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        assert_eq!(JournalError::Conflict("race".into()).http_status_code(), 409);
    }
}
