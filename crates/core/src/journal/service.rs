//! Journal entry lifecycle operations.

use chrono::{NaiveDate, Utc};
use tabula_shared::types::{JournalEntryId, TransactionLineId, UserId};

use crate::reports::service::ReportService;
use crate::reports::types::TrialBalanceReport;
use crate::store::{CompanyScopedStore, WriteBatch, WriteOp};

use super::error::JournalError;
use super::reversal;
use super::types::{
    CreateJournalInput, JournalEntry, JournalStatus, LineInput, TransactionLine,
};
use super::validation;

/// Journal engine entry points.
///
/// Stateless; every operation takes the caller's company-scoped store.
pub struct JournalService;

impl JournalService {
    /// Creates a draft journal entry.
    ///
    /// Shape rules apply (at least two lines, one side per line, no
    /// negative amounts) but balance is not required until posting.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] on shape violations, unknown accounts, or
    /// store failure.
    pub async fn create_draft(
        store: &dyn CompanyScopedStore,
        input: CreateJournalInput,
    ) -> Result<JournalEntry, JournalError> {
        validation::validate_line_shape(&input.lines)?;
        Self::ensure_accounts_exist(store, &input.lines).await?;

        let entry = JournalEntry {
            id: JournalEntryId::new(),
            company_id: store.company_id(),
            date: input.date,
            description: input.description,
            source_type: input.source_type,
            source_id: input.source_id,
            status: JournalStatus::Draft,
            created_by: input.created_by,
            created_at: Utc::now(),
            posted_at: None,
            voided_at: None,
            reversal_of: None,
        };
        let lines = materialize_lines(entry.id, &input.lines);

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal {
            entry: entry.clone(),
            lines,
        });
        store.commit(batch).await?;

        Ok(entry)
    }

    /// Replaces all lines of a draft entry.
    ///
    /// # Errors
    ///
    /// Returns a state error for posted or voided entries, shape errors for
    /// malformed lines, or [`JournalError::Conflict`] if a concurrent
    /// writer moved the entry out of draft first.
    pub async fn replace_lines(
        store: &dyn CompanyScopedStore,
        entry_id: JournalEntryId,
        lines: Vec<LineInput>,
    ) -> Result<(), JournalError> {
        let entry = Self::require_entry(store, entry_id).await?;
        ensure_draft(&entry)?;
        validation::validate_line_shape(&lines)?;
        Self::ensure_accounts_exist(store, &lines).await?;

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::ReplaceDraftLines {
            entry_id,
            lines: materialize_lines(entry_id, &lines),
        });
        store
            .commit(batch)
            .await
            .map_err(map_precondition_conflict)?;
        Ok(())
    }

    /// Deletes a draft entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns a state error for posted or voided entries.
    pub async fn delete_draft(
        store: &dyn CompanyScopedStore,
        entry_id: JournalEntryId,
    ) -> Result<(), JournalError> {
        let entry = Self::require_entry(store, entry_id).await?;
        ensure_draft(&entry)?;

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::DeleteDraftJournal { entry_id });
        store
            .commit(batch)
            .await
            .map_err(map_precondition_conflict)?;
        Ok(())
    }

    /// Posts a draft entry, making it immutable and visible to reports.
    ///
    /// Recomputes both totals from the stored lines and requires exact
    /// equality. The validated line set travels in the same batch as the
    /// status flip, so a concurrent draft edit cannot change what gets
    /// posted; a concurrent post or void of the same entry loses with
    /// [`JournalError::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UnbalancedEntry`], [`JournalError::AlreadyPosted`],
    /// [`JournalError::CannotModifyVoided`], or store/conflict errors.
    pub async fn post(
        store: &dyn CompanyScopedStore,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, JournalError> {
        let mut entry = Self::require_entry(store, entry_id).await?;
        match entry.status {
            JournalStatus::Draft => {}
            JournalStatus::Posted => return Err(JournalError::AlreadyPosted),
            JournalStatus::Voided => return Err(JournalError::CannotModifyVoided),
        }

        let lines = store.journal_lines(entry_id).await?;
        if lines.len() < 2 {
            return Err(JournalError::InsufficientLines);
        }
        validation::ensure_balanced(&lines)?;

        let posted_at = Utc::now();
        let mut batch = WriteBatch::new();
        // Pin the exact lines the balance check passed; the flip and the
        // content commit together.
        batch.push(WriteOp::ReplaceDraftLines { entry_id, lines });
        batch.push(WriteOp::SetJournalStatus {
            entry_id,
            expect: JournalStatus::Draft,
            status: JournalStatus::Posted,
            posted_at: Some(posted_at),
            voided_at: None,
        });
        store
            .commit(batch)
            .await
            .map_err(map_precondition_conflict)?;

        entry.status = JournalStatus::Posted;
        entry.posted_at = Some(posted_at);
        Ok(entry)
    }

    /// Voids a posted entry by appending its reversal.
    ///
    /// One atomic batch inserts the reversing entry (already posted) and
    /// flips the original to `Voided`. History is append-only.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::NotPosted`] unless the entry is `Posted`,
    /// or conflict/store errors.
    pub async fn void(
        store: &dyn CompanyScopedStore,
        entry_id: JournalEntryId,
        reason: &str,
        voided_by: UserId,
    ) -> Result<JournalEntry, JournalError> {
        let entry = Self::require_entry(store, entry_id).await?;
        if entry.status != JournalStatus::Posted {
            return Err(JournalError::NotPosted);
        }
        let lines = store.journal_lines(entry_id).await?;

        let (reversal_entry, reversal_lines) =
            reversal::build_reversal(&entry, &lines, reason, voided_by);

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal {
            entry: reversal_entry.clone(),
            lines: reversal_lines,
        });
        batch.push(WriteOp::SetJournalStatus {
            entry_id,
            expect: JournalStatus::Posted,
            status: JournalStatus::Voided,
            posted_at: None,
            voided_at: reversal_entry.posted_at,
        });
        store
            .commit(batch)
            .await
            .map_err(map_precondition_conflict)?;

        Ok(reversal_entry)
    }

    /// Trial balance over all posted lines through `as_of`.
    ///
    /// # Errors
    ///
    /// Returns store failures only; the fold itself is total.
    pub async fn trial_balance(
        store: &dyn CompanyScopedStore,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, JournalError> {
        let accounts = store.list_accounts().await?;
        let lines = store.posted_lines_between(NaiveDate::MIN, as_of).await?;
        Ok(ReportService::trial_balance(as_of, &accounts, &lines))
    }

    async fn require_entry(
        store: &dyn CompanyScopedStore,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, JournalError> {
        store
            .journal_entry(entry_id)
            .await?
            .ok_or_else(|| JournalError::NotFound(entry_id.to_string()))
    }

    async fn ensure_accounts_exist(
        store: &dyn CompanyScopedStore,
        lines: &[LineInput],
    ) -> Result<(), JournalError> {
        for line in lines {
            if store.account(line.account_id).await?.is_none() {
                return Err(JournalError::AccountNotFound(line.account_id.to_string()));
            }
        }
        Ok(())
    }
}

fn ensure_draft(entry: &JournalEntry) -> Result<(), JournalError> {
    match entry.status {
        JournalStatus::Draft => Ok(()),
        JournalStatus::Posted => Err(JournalError::CannotModifyPosted),
        JournalStatus::Voided => Err(JournalError::CannotModifyVoided),
    }
}

pub(crate) fn materialize_lines(
    entry_id: JournalEntryId,
    inputs: &[LineInput],
) -> Vec<TransactionLine> {
    inputs
        .iter()
        .map(|input| TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: entry_id,
            account_id: input.account_id,
            debit: input.debit,
            credit: input.credit,
            tax_code_id: input.tax_code_id,
            counterparty_id: input.counterparty_id,
            description: input.description.clone(),
        })
        .collect()
}

fn map_precondition_conflict(err: crate::store::StoreError) -> JournalError {
    match err {
        crate::store::StoreError::PreconditionFailed(msg) => JournalError::Conflict(msg),
        other => JournalError::Store(other),
    }
}
