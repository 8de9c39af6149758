//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabula_shared::types::{AccountId, CompanyId, JournalEntryId, TransactionLineId, UserId};
use uuid::Uuid;

/// Lifecycle status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Editable; not yet part of the ledger.
    Draft,
    /// Immutable; contributes to all reports.
    Posted,
    /// Terminal; offset by a reversing entry.
    Voided,
}

impl std::fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        };
        write!(f, "{s}")
    }
}

/// Origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Entered by hand.
    Manual,
    /// Generated from a quotation.
    Quotation,
    /// Generated from a contract.
    Contract,
    /// Generated from a point-of-sale transaction.
    Pos,
    /// Generated by invoice posting.
    Invoice,
}

/// A journal entry header. Owns its [`TransactionLine`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Company this entry belongs to.
    pub company_id: CompanyId,
    /// Business date of the entry.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Where this entry came from.
    pub source_type: SourceType,
    /// Back-reference to the source document, if any. Lookup only.
    pub source_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// User who created the entry.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
    /// Entry this one reverses, if it is a reversal.
    pub reversal_of: Option<JournalEntryId>,
}

/// One debit or credit line of a journal entry.
///
/// Exactly one of `debit`/`credit` is non-zero; the other side is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier.
    pub id: TransactionLineId,
    /// Owning journal entry.
    pub journal_entry_id: JournalEntryId,
    /// Account this line hits.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional tax code reference.
    pub tax_code_id: Option<Uuid>,
    /// Optional counterparty reference.
    pub counterparty_id: Option<Uuid>,
    /// Optional line description.
    pub description: Option<String>,
}

/// Input for one line when creating or editing a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    /// Account this line hits.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional tax code reference.
    pub tax_code_id: Option<Uuid>,
    /// Optional counterparty reference.
    pub counterparty_id: Option<Uuid>,
    /// Optional line description.
    pub description: Option<String>,
}

impl LineInput {
    /// Shorthand for a plain debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            tax_code_id: None,
            counterparty_id: None,
            description: None,
        }
    }

    /// Shorthand for a plain credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            tax_code_id: None,
            counterparty_id: None,
            description: None,
        }
    }
}

/// Input for creating a draft journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJournalInput {
    /// Business date of the entry.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Where this entry came from.
    pub source_type: SourceType,
    /// Back-reference to the source document, if any.
    pub source_id: Option<Uuid>,
    /// User creating the entry.
    pub created_by: UserId,
    /// The entry's lines (at least two).
    pub lines: Vec<LineInput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_display() {
        assert_eq!(JournalStatus::Draft.to_string(), "draft");
        assert_eq!(JournalStatus::Posted.to_string(), "posted");
        assert_eq!(JournalStatus::Voided.to_string(), "voided");
    }

    #[test]
    fn test_line_input_shorthands() {
        let account = AccountId::new();

        let d = LineInput::debit(account, dec!(100));
        assert_eq!(d.debit, dec!(100));
        assert_eq!(d.credit, Decimal::ZERO);

        let c = LineInput::credit(account, dec!(100));
        assert_eq!(c.debit, Decimal::ZERO);
        assert_eq!(c.credit, dec!(100));
    }
}
