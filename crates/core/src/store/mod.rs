//! Data-store port consumed by the engines.
//!
//! A [`CompanyScopedStore`] is a capability object: it is constructed with
//! one company's id baked in, so every read and write it performs is scoped
//! to that company. Engines never see a cross-company handle.
//!
//! Writes go through [`CompanyScopedStore::commit`] as a [`WriteBatch`]:
//! the batch applies atomically or not at all, and status preconditions
//! (`expect`) turn concurrent post/void races into a compare-and-set that
//! exactly one caller wins.

use async_trait::async_trait;
use chrono::NaiveDate;
use tabula_shared::types::{AccountId, CompanyId, InvoiceId, JournalEntryId};
use thiserror::Error;

use crate::account::Account;
use crate::invoice::{Invoice, InvoiceStatus, Payment};
use crate::journal::{JournalEntry, JournalStatus, TransactionLine};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A status precondition in a write batch did not hold.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A uniqueness constraint was violated.
    #[error("Unique violation: {0}")]
    UniqueViolation(String),

    /// A row referenced by a read or write does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store is unreachable or failed internally.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PreconditionFailed(_) => "PRECONDITION_FAILED",
            Self::UniqueViolation(_) => "UNIQUE_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::PreconditionFailed(_) => 409,
            Self::UniqueViolation(_) => 409,
            Self::NotFound(_) => 404,
            Self::Unavailable(_) => 503,
        }
    }
}

/// A single write operation inside a [`WriteBatch`].
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert a journal entry together with its lines.
    InsertJournal {
        /// The entry to insert.
        entry: JournalEntry,
        /// Its owned lines.
        lines: Vec<TransactionLine>,
    },
    /// Replace all lines of a draft entry.
    ReplaceDraftLines {
        /// Target entry; must still be `Draft` at commit time.
        entry_id: JournalEntryId,
        /// The new line set.
        lines: Vec<TransactionLine>,
    },
    /// Flip a journal entry's status, guarded by its expected current status.
    SetJournalStatus {
        /// Target entry.
        entry_id: JournalEntryId,
        /// Status the entry must currently have.
        expect: JournalStatus,
        /// Status to set.
        status: JournalStatus,
        /// `posted_at` to record when transitioning to `Posted`.
        posted_at: Option<chrono::DateTime<chrono::Utc>>,
        /// `voided_at` to record when transitioning to `Voided`.
        voided_at: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// Delete a draft entry and its lines.
    DeleteDraftJournal {
        /// Target entry; must still be `Draft` at commit time.
        entry_id: JournalEntryId,
    },
    /// Insert an invoice.
    InsertInvoice {
        /// The invoice to insert.
        invoice: Invoice,
    },
    /// Replace a draft invoice's fields.
    ReplaceDraftInvoice {
        /// The replacement row; its id names the target, which must still
        /// be `Draft` at commit time.
        invoice: Invoice,
    },
    /// Flip an invoice's status, guarded by its expected current status.
    SetInvoiceStatus {
        /// Target invoice.
        invoice_id: InvoiceId,
        /// Status the invoice must currently have.
        expect: InvoiceStatus,
        /// Status to set.
        status: InvoiceStatus,
        /// Journal entry to link when posting.
        journal_entry_id: Option<JournalEntryId>,
    },
    /// Insert a payment row, guarded by the invoice state the caller
    /// computed the outstanding balance against.
    InsertPayment {
        /// The payment to insert.
        payment: Payment,
        /// Status the invoice must currently have.
        expect_status: InvoiceStatus,
        /// Sum of payments already on the invoice when the balance was
        /// checked; a concurrent payment changes this and fails the batch.
        expect_paid_before: i64,
    },
}

/// An atomic, all-or-nothing list of write operations.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation to the batch.
    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    /// The operations in insertion order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consumes the batch, yielding its operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    /// Whether the batch contains no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Company-scoped data access used by all engines.
///
/// Row lookups return `Ok(None)` for absent rows; `Err` is reserved for
/// store failures. Range scans are inclusive on both bounds.
#[async_trait]
pub trait CompanyScopedStore: Send + Sync {
    /// The company this handle is scoped to.
    fn company_id(&self) -> CompanyId;

    /// Fetches one account.
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts in the company's chart, ordered by code.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Fetches one journal entry.
    async fn journal_entry(&self, id: JournalEntryId)
        -> Result<Option<JournalEntry>, StoreError>;

    /// Fetches the lines of a journal entry.
    async fn journal_lines(&self, id: JournalEntryId)
        -> Result<Vec<TransactionLine>, StoreError>;

    /// Fetches one invoice.
    async fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Fetches an invoice by its normalized number.
    async fn invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError>;

    /// Lists payments recorded against an invoice, oldest first.
    async fn payments_for_invoice(&self, id: InvoiceId) -> Result<Vec<Payment>, StoreError>;

    /// Lines of entries that have been posted, dated in `[from, to]`.
    ///
    /// Includes `Voided` entries: a voided entry was posted, and its
    /// posted reversal cancels it in every fold. Drafts never appear.
    async fn posted_lines_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TransactionLine>, StoreError>;

    /// Invoices dated in `[from, to]`, any status.
    async fn invoices_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Invoice>, StoreError>;

    /// Applies a write batch atomically.
    ///
    /// Every precondition in the batch is checked before any operation is
    /// applied; a failed check aborts the whole batch.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_codes() {
        assert_eq!(
            StoreError::PreconditionFailed(String::new()).error_code(),
            "PRECONDITION_FAILED"
        );
        assert_eq!(
            StoreError::UniqueViolation(String::new()).error_code(),
            "UNIQUE_VIOLATION"
        );
        assert_eq!(StoreError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            StoreError::Unavailable(String::new()).error_code(),
            "STORE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_store_error_status_codes() {
        assert_eq!(StoreError::PreconditionFailed(String::new()).http_status_code(), 409);
        assert_eq!(StoreError::UniqueViolation(String::new()).http_status_code(), 409);
        assert_eq!(StoreError::NotFound(String::new()).http_status_code(), 404);
        assert_eq!(StoreError::Unavailable(String::new()).http_status_code(), 503);
    }

    #[test]
    fn test_write_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch.push(WriteOp::DeleteDraftJournal {
            entry_id: JournalEntryId::new(),
        });
        batch.push(WriteOp::DeleteDraftJournal {
            entry_id: JournalEntryId::new(),
        });
        assert_eq!(batch.ops().len(), 2);
        assert_eq!(batch.into_ops().len(), 2);
    }
}
