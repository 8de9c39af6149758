//! Reversing-entry construction.
//!
//! Voiding never deletes: a posted entry is offset by a new entry whose
//! lines mirror the original with debit and credit swapped. The pair nets
//! to zero in every report while both remain queryable.

use chrono::Utc;
use tabula_shared::types::{JournalEntryId, TransactionLineId, UserId};

use super::types::{JournalEntry, JournalStatus, TransactionLine};

/// Builds the reversing entry for a posted original.
///
/// The reversal is created already `Posted` with today's timestamp as
/// `posted_at`, carries `reversal_of` back to the original, and keeps the
/// original's date so both sides land in the same reporting period.
#[must_use]
pub fn build_reversal(
    original: &JournalEntry,
    original_lines: &[TransactionLine],
    reason: &str,
    voided_by: UserId,
) -> (JournalEntry, Vec<TransactionLine>) {
    let now = Utc::now();
    let reversal_id = JournalEntryId::new();

    let entry = JournalEntry {
        id: reversal_id,
        company_id: original.company_id,
        date: original.date,
        description: format!("Reversal of {}: {reason}", original.id),
        source_type: original.source_type,
        source_id: original.source_id,
        status: JournalStatus::Posted,
        created_by: voided_by,
        created_at: now,
        posted_at: Some(now),
        voided_at: None,
        reversal_of: Some(original.id),
    };

    let lines = original_lines
        .iter()
        .map(|line| TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: reversal_id,
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            tax_code_id: line.tax_code_id,
            counterparty_id: line.counterparty_id,
            description: line.description.clone(),
        })
        .collect();

    (entry, lines)
}
