//! The in-memory backend and its company-scoped handles.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use tabula_core::account::{Account, ChartOfAccounts};
use tabula_core::invoice::{Invoice, InvoiceStatus, Payment};
use tabula_core::journal::{JournalEntry, JournalStatus, TransactionLine};
use tabula_core::store::{CompanyScopedStore, StoreError, WriteBatch, WriteOp};
use tabula_shared::types::{AccountId, CompanyId, InvoiceId, JournalEntryId};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    journal_entries: HashMap<JournalEntryId, JournalEntry>,
    journal_lines: HashMap<JournalEntryId, Vec<TransactionLine>>,
    invoices: HashMap<InvoiceId, Invoice>,
    invoice_numbers: HashMap<(CompanyId, String), InvoiceId>,
    payments: HashMap<InvoiceId, Vec<Payment>>,
}

/// Shared in-memory store holding every company's rows.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the standard chart of accounts for a company.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the backing lock is poisoned.
    pub fn seed_chart(&self, company_id: CompanyId) -> Result<Vec<Account>, StoreError> {
        let accounts = ChartOfAccounts::standard(company_id);
        let mut inner = self.write()?;
        for account in &accounts {
            inner.accounts.insert(account.id, account.clone());
        }
        Ok(accounts)
    }

    /// Creates a handle scoped to one company.
    #[must_use]
    pub fn scoped(&self, company_id: CompanyId) -> MemoryStore {
        MemoryStore {
            inner: Arc::clone(&self.inner),
            company_id,
        }
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

/// A [`CompanyScopedStore`] over a [`MemoryBackend`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    company_id: CompanyId,
}

impl MemoryStore {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn owned_entry<'a>(
        &self,
        inner: &'a Inner,
        id: JournalEntryId,
    ) -> Option<&'a JournalEntry> {
        inner
            .journal_entries
            .get(&id)
            .filter(|e| e.company_id == self.company_id)
    }

    fn owned_invoice<'a>(&self, inner: &'a Inner, id: InvoiceId) -> Option<&'a Invoice> {
        inner
            .invoices
            .get(&id)
            .filter(|i| i.company_id == self.company_id)
    }

    /// Checks one operation's preconditions against the current state.
    fn check(&self, inner: &Inner, op: &WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::InsertJournal { entry, .. } => {
                if entry.company_id != self.company_id {
                    return Err(StoreError::PreconditionFailed(
                        "journal entry belongs to another company".into(),
                    ));
                }
                if inner.journal_entries.contains_key(&entry.id) {
                    return Err(StoreError::UniqueViolation(format!(
                        "journal entry {} already exists",
                        entry.id
                    )));
                }
            }
            WriteOp::ReplaceDraftLines { entry_id, .. }
            | WriteOp::DeleteDraftJournal { entry_id } => {
                let entry = self
                    .owned_entry(inner, *entry_id)
                    .ok_or_else(|| StoreError::NotFound(format!("journal entry {entry_id}")))?;
                if entry.status != JournalStatus::Draft {
                    return Err(StoreError::PreconditionFailed(format!(
                        "journal entry {entry_id} is {}, expected draft",
                        entry.status
                    )));
                }
            }
            WriteOp::SetJournalStatus {
                entry_id, expect, ..
            } => {
                let entry = self
                    .owned_entry(inner, *entry_id)
                    .ok_or_else(|| StoreError::NotFound(format!("journal entry {entry_id}")))?;
                if entry.status != *expect {
                    return Err(StoreError::PreconditionFailed(format!(
                        "journal entry {entry_id} is {}, expected {expect}",
                        entry.status
                    )));
                }
            }
            WriteOp::InsertInvoice { invoice } => {
                if invoice.company_id != self.company_id {
                    return Err(StoreError::PreconditionFailed(
                        "invoice belongs to another company".into(),
                    ));
                }
                if inner.invoices.contains_key(&invoice.id) {
                    return Err(StoreError::UniqueViolation(format!(
                        "invoice {} already exists",
                        invoice.id
                    )));
                }
                let key = (self.company_id, invoice.number.clone());
                if inner.invoice_numbers.contains_key(&key) {
                    return Err(StoreError::UniqueViolation(invoice.number.clone()));
                }
            }
            WriteOp::ReplaceDraftInvoice { invoice } => {
                let existing = self
                    .owned_invoice(inner, invoice.id)
                    .ok_or_else(|| StoreError::NotFound(format!("invoice {}", invoice.id)))?;
                if existing.status != InvoiceStatus::Draft {
                    return Err(StoreError::PreconditionFailed(format!(
                        "invoice {} is {}, expected draft",
                        invoice.id, existing.status
                    )));
                }
                if invoice.number != existing.number {
                    let key = (self.company_id, invoice.number.clone());
                    if inner.invoice_numbers.contains_key(&key) {
                        return Err(StoreError::UniqueViolation(invoice.number.clone()));
                    }
                }
            }
            WriteOp::SetInvoiceStatus {
                invoice_id, expect, ..
            } => {
                let invoice = self
                    .owned_invoice(inner, *invoice_id)
                    .ok_or_else(|| StoreError::NotFound(format!("invoice {invoice_id}")))?;
                if invoice.status != *expect {
                    return Err(StoreError::PreconditionFailed(format!(
                        "invoice {invoice_id} is {}, expected {expect}",
                        invoice.status
                    )));
                }
            }
            WriteOp::InsertPayment {
                payment,
                expect_status,
                expect_paid_before,
            } => {
                let invoice = self.owned_invoice(inner, payment.invoice_id).ok_or_else(|| {
                    StoreError::NotFound(format!("invoice {}", payment.invoice_id))
                })?;
                if invoice.status != *expect_status {
                    return Err(StoreError::PreconditionFailed(format!(
                        "invoice {} is {}, expected {expect_status}",
                        payment.invoice_id, invoice.status
                    )));
                }
                let paid: i64 = inner
                    .payments
                    .get(&payment.invoice_id)
                    .map_or(0, |ps| ps.iter().map(|p| p.amount).sum());
                if paid != *expect_paid_before {
                    return Err(StoreError::PreconditionFailed(format!(
                        "invoice {} has {paid} paid, expected {expect_paid_before}",
                        payment.invoice_id
                    )));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, inner: &mut Inner, op: WriteOp) {
        match op {
            WriteOp::InsertJournal { entry, lines } => {
                inner.journal_lines.insert(entry.id, lines);
                inner.journal_entries.insert(entry.id, entry);
            }
            WriteOp::ReplaceDraftLines { entry_id, lines } => {
                inner.journal_lines.insert(entry_id, lines);
            }
            WriteOp::SetJournalStatus {
                entry_id,
                status,
                posted_at,
                voided_at,
                ..
            } => {
                if let Some(entry) = inner.journal_entries.get_mut(&entry_id) {
                    entry.status = status;
                    if posted_at.is_some() {
                        entry.posted_at = posted_at;
                    }
                    if voided_at.is_some() {
                        entry.voided_at = voided_at;
                    }
                }
            }
            WriteOp::DeleteDraftJournal { entry_id } => {
                inner.journal_entries.remove(&entry_id);
                inner.journal_lines.remove(&entry_id);
            }
            WriteOp::InsertInvoice { invoice } => {
                inner
                    .invoice_numbers
                    .insert((invoice.company_id, invoice.number.clone()), invoice.id);
                inner.invoices.insert(invoice.id, invoice);
            }
            WriteOp::ReplaceDraftInvoice { invoice } => {
                if let Some(old) = inner.invoices.get(&invoice.id) {
                    if old.number != invoice.number {
                        inner
                            .invoice_numbers
                            .remove(&(old.company_id, old.number.clone()));
                        inner
                            .invoice_numbers
                            .insert((invoice.company_id, invoice.number.clone()), invoice.id);
                    }
                }
                inner.invoices.insert(invoice.id, invoice);
            }
            WriteOp::SetInvoiceStatus {
                invoice_id,
                status,
                journal_entry_id,
                ..
            } => {
                if let Some(invoice) = inner.invoices.get_mut(&invoice_id) {
                    invoice.status = status;
                    if journal_entry_id.is_some() {
                        invoice.journal_entry_id = journal_entry_id;
                    }
                    invoice.updated_at = chrono::Utc::now();
                }
            }
            WriteOp::InsertPayment { payment, .. } => {
                inner
                    .payments
                    .entry(payment.invoice_id)
                    .or_default()
                    .push(payment);
            }
        }
    }
}

#[async_trait]
impl CompanyScopedStore for MemoryStore {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .accounts
            .get(&id)
            .filter(|a| a.company_id == self.company_id)
            .cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.read()?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|a| a.company_id == self.company_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn journal_entry(
        &self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let inner = self.read()?;
        Ok(self.owned_entry(&inner, id).cloned())
    }

    async fn journal_lines(
        &self,
        id: JournalEntryId,
    ) -> Result<Vec<TransactionLine>, StoreError> {
        let inner = self.read()?;
        if self.owned_entry(&inner, id).is_none() {
            return Ok(Vec::new());
        }
        Ok(inner.journal_lines.get(&id).cloned().unwrap_or_default())
    }

    async fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let inner = self.read()?;
        Ok(self.owned_invoice(&inner, id).cloned())
    }

    async fn invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError> {
        let inner = self.read()?;
        let id = inner
            .invoice_numbers
            .get(&(self.company_id, number.to_string()));
        Ok(id.and_then(|id| inner.invoices.get(id)).cloned())
    }

    async fn payments_for_invoice(&self, id: InvoiceId) -> Result<Vec<Payment>, StoreError> {
        let inner = self.read()?;
        if self.owned_invoice(&inner, id).is_none() {
            return Ok(Vec::new());
        }
        Ok(inner.payments.get(&id).cloned().unwrap_or_default())
    }

    async fn posted_lines_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TransactionLine>, StoreError> {
        let inner = self.read()?;
        let mut lines = Vec::new();
        for entry in inner.journal_entries.values() {
            let ever_posted = matches!(
                entry.status,
                JournalStatus::Posted | JournalStatus::Voided
            );
            if entry.company_id != self.company_id
                || !ever_posted
                || entry.date < from
                || entry.date > to
            {
                continue;
            }
            if let Some(entry_lines) = inner.journal_lines.get(&entry.id) {
                lines.extend(entry_lines.iter().cloned());
            }
        }
        Ok(lines)
    }

    async fn invoices_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Invoice>, StoreError> {
        let inner = self.read()?;
        let mut invoices: Vec<Invoice> = inner
            .invoices
            .values()
            .filter(|i| i.company_id == self.company_id && i.date >= from && i.date <= to)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| (a.date, &a.number).cmp(&(b.date, &b.number)));
        Ok(invoices)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let ops = batch.into_ops();
        let mut inner = self.write()?;

        // Validate everything first so a failed batch changes nothing.
        for op in &ops {
            self.check(&inner, op)?;
        }

        debug!(company_id = %self.company_id, ops = ops.len(), "committing write batch");
        for op in ops {
            self.apply(&mut inner, op);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tabula_core::journal::types::SourceType;
    use tabula_shared::types::{TransactionLineId, UserId};

    fn draft_entry(company_id: CompanyId) -> (JournalEntry, Vec<TransactionLine>) {
        let id = JournalEntryId::new();
        let entry = JournalEntry {
            id,
            company_id,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "test".into(),
            source_type: SourceType::Manual,
            source_id: None,
            status: JournalStatus::Draft,
            created_by: UserId::new(),
            created_at: Utc::now(),
            posted_at: None,
            voided_at: None,
            reversal_of: None,
        };
        let lines = vec![
            TransactionLine {
                id: TransactionLineId::new(),
                journal_entry_id: id,
                account_id: AccountId::new(),
                debit: dec!(100),
                credit: dec!(0),
                tax_code_id: None,
                counterparty_id: None,
                description: None,
            },
            TransactionLine {
                id: TransactionLineId::new(),
                journal_entry_id: id,
                account_id: AccountId::new(),
                debit: dec!(0),
                credit: dec!(100),
                tax_code_id: None,
                counterparty_id: None,
                description: None,
            },
        ];
        (entry, lines)
    }

    #[tokio::test]
    async fn test_scoped_handle_cannot_read_other_company() {
        let backend = MemoryBackend::new();
        let company_a = CompanyId::new();
        let company_b = CompanyId::new();
        let accounts = backend.seed_chart(company_a).unwrap();

        let store_b = backend.scoped(company_b);
        assert!(store_b.account(accounts[0].id).await.unwrap().is_none());
        assert!(store_b.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_changes_nothing() {
        let backend = MemoryBackend::new();
        let company = CompanyId::new();
        let store = backend.scoped(company);

        let (entry, lines) = draft_entry(company);
        let entry_id = entry.id;

        // Second op's precondition fails: the entry is Draft, not Posted.
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal { entry, lines });
        batch.push(WriteOp::SetJournalStatus {
            entry_id,
            expect: JournalStatus::Posted,
            status: JournalStatus::Voided,
            posted_at: None,
            voided_at: None,
        });
        assert!(store.commit(batch).await.is_err());

        // The insert in the same batch must not have applied.
        assert!(store.journal_entry(entry_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_precondition_compare_and_set() {
        let backend = MemoryBackend::new();
        let company = CompanyId::new();
        let store = backend.scoped(company);

        let (entry, lines) = draft_entry(company);
        let entry_id = entry.id;
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal { entry, lines });
        store.commit(batch).await.unwrap();

        let post = |posted_at| {
            let mut batch = WriteBatch::new();
            batch.push(WriteOp::SetJournalStatus {
                entry_id,
                expect: JournalStatus::Draft,
                status: JournalStatus::Posted,
                posted_at: Some(posted_at),
                voided_at: None,
            });
            batch
        };

        store.commit(post(Utc::now())).await.unwrap();
        // A second identical flip loses the compare-and-set.
        let err = store.commit(post(Utc::now())).await.unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_duplicate_invoice_number_rejected_per_company() {
        let backend = MemoryBackend::new();
        let company_a = CompanyId::new();
        let company_b = CompanyId::new();

        let mk = |company_id| Invoice {
            id: InvoiceId::new(),
            company_id,
            number: "AB12345678".into(),
            invoice_type: tabula_core::invoice::InvoiceType::Output,
            status: InvoiceStatus::Draft,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            untaxed_amount: 100,
            tax_amount: 5,
            total_amount: 105,
            counterparty_name: "Acme".into(),
            counterparty_tax_id: None,
            description: String::new(),
            due_date: None,
            journal_entry_id: None,
            classification: tabula_core::invoice::TaxClassification::Taxable,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let store_a = backend.scoped(company_a);
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertInvoice {
            invoice: mk(company_a),
        });
        store_a.commit(batch).await.unwrap();

        // Same number in the same company: rejected.
        let mut dup = WriteBatch::new();
        dup.push(WriteOp::InsertInvoice {
            invoice: mk(company_a),
        });
        assert!(matches!(
            store_a.commit(dup).await.unwrap_err(),
            StoreError::UniqueViolation(_)
        ));

        // Same number in another company: fine.
        let store_b = backend.scoped(company_b);
        let mut other = WriteBatch::new();
        other.push(WriteOp::InsertInvoice {
            invoice: mk(company_b),
        });
        store_b.commit(other).await.unwrap();
    }
}
