//! Invoice lifecycle operations.

use chrono::{NaiveDate, Utc};
use tabula_shared::types::{InvoiceId, JournalEntryId, PaymentId, UserId};

use crate::account::ChartOfAccounts;
use crate::journal::service::materialize_lines;
use crate::journal::types::{JournalEntry, JournalStatus, SourceType};
use crate::journal;
use crate::store::{CompanyScopedStore, StoreError, WriteBatch, WriteOp};

use super::error::InvoiceError;
use super::posting;
use super::types::{
    normalize_invoice_number, CreateInvoiceInput, Invoice, InvoiceStatus, Payment, PaymentMethod,
};

/// Invoice engine entry points.
///
/// Stateless; every operation takes the caller's company-scoped store.
pub struct InvoiceService;

impl InvoiceService {
    /// Creates a draft invoice.
    ///
    /// Validates the number format, per-company uniqueness, the amount
    /// identity (`total = untaxed + tax`, all non-negative), classification
    /// compatibility, and the counterparty tax-id shape.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError`] on any validation failure or store error.
    pub async fn create(
        store: &dyn CompanyScopedStore,
        input: CreateInvoiceInput,
    ) -> Result<Invoice, InvoiceError> {
        let number = normalize_invoice_number(&input.number)?;
        validate_amounts(&input)?;
        validate_classification(&input)?;
        validate_counterparty_tax_id(input.counterparty_tax_id.as_deref())?;

        if store.invoice_by_number(&number).await?.is_some() {
            return Err(InvoiceError::DuplicateNumber(number));
        }

        let now = Utc::now();
        let invoice = Invoice {
            id: InvoiceId::new(),
            company_id: store.company_id(),
            number,
            invoice_type: input.invoice_type,
            status: InvoiceStatus::Draft,
            date: input.date,
            untaxed_amount: input.untaxed_amount,
            tax_amount: input.tax_amount,
            total_amount: input.total_amount,
            counterparty_name: input.counterparty_name,
            counterparty_tax_id: input.counterparty_tax_id,
            description: input.description,
            due_date: input.due_date,
            journal_entry_id: None,
            classification: input.classification,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertInvoice {
            invoice: invoice.clone(),
        });
        store.commit(batch).await.map_err(map_store_error)?;

        Ok(invoice)
    }

    /// Edits a draft invoice, re-running all creation-time validation.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidState`] unless the invoice is
    /// `Draft`, plus any validation or store error.
    pub async fn update_draft(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
        input: CreateInvoiceInput,
    ) -> Result<Invoice, InvoiceError> {
        let existing = Self::require_invoice(store, id).await?;
        if existing.status != InvoiceStatus::Draft {
            return Err(InvoiceError::InvalidState(format!(
                "only draft invoices can be edited; status is {}",
                existing.status
            )));
        }

        let number = normalize_invoice_number(&input.number)?;
        validate_amounts(&input)?;
        validate_classification(&input)?;
        validate_counterparty_tax_id(input.counterparty_tax_id.as_deref())?;

        if number != existing.number && store.invoice_by_number(&number).await?.is_some() {
            return Err(InvoiceError::DuplicateNumber(number));
        }

        let updated = Invoice {
            number,
            invoice_type: input.invoice_type,
            date: input.date,
            untaxed_amount: input.untaxed_amount,
            tax_amount: input.tax_amount,
            total_amount: input.total_amount,
            counterparty_name: input.counterparty_name,
            counterparty_tax_id: input.counterparty_tax_id,
            description: input.description,
            due_date: input.due_date,
            classification: input.classification,
            updated_at: Utc::now(),
            ..existing
        };

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::ReplaceDraftInvoice {
            invoice: updated.clone(),
        });
        store.commit(batch).await.map_err(map_store_error)?;

        Ok(updated)
    }

    /// Marks a draft invoice as verified against its source documents.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidTransition`] unless the invoice is
    /// `Draft`.
    pub async fn verify(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = Self::require_invoice(store, id).await?;
        if invoice.status != InvoiceStatus::Draft {
            return Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Verified,
            });
        }

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::SetInvoiceStatus {
            invoice_id: id,
            expect: InvoiceStatus::Draft,
            status: InvoiceStatus::Verified,
            journal_entry_id: None,
        });
        store.commit(batch).await.map_err(map_store_error)?;

        invoice.status = InvoiceStatus::Verified;
        invoice.updated_at = Utc::now();
        Ok(invoice)
    }

    /// Posts a verified invoice to the ledger.
    ///
    /// Derives the balanced journal entry from the invoice's type and
    /// classification, then inserts the entry (already posted) and flips
    /// the invoice to `Posted` in one atomic batch. On failure the invoice
    /// stays `Verified` and no journal entry exists.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidTransition`] unless the invoice is
    /// `Verified`, plus derivation and store errors.
    pub async fn post(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = Self::require_invoice(store, id).await?;
        if invoice.status != InvoiceStatus::Verified {
            return Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Posted,
            });
        }

        let chart = ChartOfAccounts::from_accounts(store.list_accounts().await?);
        let line_inputs = posting::derive_posting(&invoice, &chart)?;

        let now = Utc::now();
        let entry_id = JournalEntryId::new();
        let entry = JournalEntry {
            id: entry_id,
            company_id: store.company_id(),
            date: invoice.date,
            description: format!("Invoice {}: {}", invoice.number, invoice.description),
            source_type: SourceType::Invoice,
            source_id: Some(invoice.id.into_inner()),
            status: JournalStatus::Posted,
            created_by: invoice.created_by,
            created_at: now,
            posted_at: Some(now),
            voided_at: None,
            reversal_of: None,
        };
        let lines = materialize_lines(entry_id, &line_inputs);

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal {
            entry,
            lines,
        });
        batch.push(WriteOp::SetInvoiceStatus {
            invoice_id: id,
            expect: InvoiceStatus::Verified,
            status: InvoiceStatus::Posted,
            journal_entry_id: Some(entry_id),
        });
        store.commit(batch).await.map_err(map_store_error)?;

        invoice.status = InvoiceStatus::Posted;
        invoice.journal_entry_id = Some(entry_id);
        invoice.updated_at = now;
        Ok(invoice)
    }

    /// Voids an invoice.
    ///
    /// A posted invoice's linked journal entry is reversed and voided in
    /// the same batch that marks the invoice voided. Draft and verified
    /// invoices are simply marked voided; voided invoices are terminal.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidTransition`] for an already-voided
    /// invoice, plus store errors.
    pub async fn void(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
        reason: &str,
        voided_by: UserId,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = Self::require_invoice(store, id).await?;

        let mut batch = WriteBatch::new();
        match invoice.status {
            InvoiceStatus::Draft | InvoiceStatus::Verified => {
                batch.push(WriteOp::SetInvoiceStatus {
                    invoice_id: id,
                    expect: invoice.status,
                    status: InvoiceStatus::Voided,
                    journal_entry_id: None,
                });
            }
            InvoiceStatus::Posted => {
                let entry_id = invoice.journal_entry_id.ok_or_else(|| {
                    InvoiceError::InvalidState(format!(
                        "posted invoice {} has no linked journal entry",
                        invoice.number
                    ))
                })?;
                let entry = store.journal_entry(entry_id).await?.ok_or_else(|| {
                    InvoiceError::InvalidState(format!(
                        "journal entry {entry_id} linked by invoice {} is missing",
                        invoice.number
                    ))
                })?;
                let entry_lines = store.journal_lines(entry_id).await?;

                let (reversal_entry, reversal_lines) =
                    journal::reversal::build_reversal(&entry, &entry_lines, reason, voided_by);
                let voided_at = reversal_entry.posted_at;

                batch.push(WriteOp::InsertJournal {
                    entry: reversal_entry,
                    lines: reversal_lines,
                });
                batch.push(WriteOp::SetJournalStatus {
                    entry_id,
                    expect: JournalStatus::Posted,
                    status: JournalStatus::Voided,
                    posted_at: None,
                    voided_at,
                });
                batch.push(WriteOp::SetInvoiceStatus {
                    invoice_id: id,
                    expect: InvoiceStatus::Posted,
                    status: InvoiceStatus::Voided,
                    journal_entry_id: None,
                });
            }
            InvoiceStatus::Voided => {
                return Err(InvoiceError::InvalidTransition {
                    from: InvoiceStatus::Voided,
                    to: InvoiceStatus::Voided,
                });
            }
        }

        store.commit(batch).await.map_err(map_store_error)?;

        invoice.status = InvoiceStatus::Voided;
        invoice.updated_at = Utc::now();
        Ok(invoice)
    }

    /// Records a payment against a posted invoice.
    ///
    /// Partial payments are allowed; a payment larger than the outstanding
    /// balance is rejected. Writes the settlement journal entry and the
    /// payment row in one batch; the batch carries the paid total the
    /// balance check ran against, so a concurrent payment or void fails
    /// the commit instead of slipping past the check. Invoice status is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidState`] unless the invoice is
    /// `Posted`, [`InvoiceError::AmountExceedsBalance`] on overpayment,
    /// or validation/store errors.
    pub async fn record_payment(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
        amount: i64,
        date: NaiveDate,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> Result<Payment, InvoiceError> {
        if amount <= 0 {
            return Err(InvoiceError::Validation(
                "payment amount must be positive".into(),
            ));
        }

        let invoice = Self::require_invoice(store, id).await?;
        if invoice.status != InvoiceStatus::Posted {
            return Err(InvoiceError::InvalidState(format!(
                "payments require a posted invoice; status is {}",
                invoice.status
            )));
        }

        let paid: i64 = store
            .payments_for_invoice(id)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();
        let outstanding = invoice.outstanding(paid);
        if amount > outstanding {
            return Err(InvoiceError::AmountExceedsBalance {
                requested: amount,
                outstanding,
            });
        }

        let chart = ChartOfAccounts::from_accounts(store.list_accounts().await?);
        let line_inputs = posting::derive_settlement(&invoice, &chart, amount)?;

        let now = Utc::now();
        let entry_id = JournalEntryId::new();
        let entry = JournalEntry {
            id: entry_id,
            company_id: store.company_id(),
            date,
            description: format!("Payment for invoice {}", invoice.number),
            source_type: SourceType::Invoice,
            source_id: Some(invoice.id.into_inner()),
            status: JournalStatus::Posted,
            created_by: invoice.created_by,
            created_at: now,
            posted_at: Some(now),
            voided_at: None,
            reversal_of: None,
        };
        let lines = materialize_lines(entry_id, &line_inputs);

        let payment = Payment {
            id: PaymentId::new(),
            invoice_id: id,
            amount,
            date,
            method,
            reference,
            journal_entry_id: entry_id,
            created_at: now,
        };

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::InsertJournal { entry, lines });
        batch.push(WriteOp::InsertPayment {
            payment: payment.clone(),
            expect_status: InvoiceStatus::Posted,
            expect_paid_before: paid,
        });
        store.commit(batch).await.map_err(map_store_error)?;

        Ok(payment)
    }

    async fn require_invoice(
        store: &dyn CompanyScopedStore,
        id: InvoiceId,
    ) -> Result<Invoice, InvoiceError> {
        store
            .invoice(id)
            .await?
            .ok_or_else(|| InvoiceError::NotFound(id.to_string()))
    }
}

fn validate_amounts(input: &CreateInvoiceInput) -> Result<(), InvoiceError> {
    if input.untaxed_amount < 0 {
        return Err(InvoiceError::NegativeAmount("untaxed_amount".into()));
    }
    if input.tax_amount < 0 {
        return Err(InvoiceError::NegativeAmount("tax_amount".into()));
    }
    if input.total_amount < 0 {
        return Err(InvoiceError::NegativeAmount("total_amount".into()));
    }
    if input.total_amount != input.untaxed_amount + input.tax_amount {
        return Err(InvoiceError::AmountMismatch {
            untaxed: input.untaxed_amount,
            tax: input.tax_amount,
            total: input.total_amount,
        });
    }
    Ok(())
}

fn validate_classification(input: &CreateInvoiceInput) -> Result<(), InvoiceError> {
    if !input.classification.valid_for(input.invoice_type) {
        return Err(InvoiceError::InvalidClassification(format!(
            "{:?} is not valid for {:?} invoices",
            input.classification, input.invoice_type
        )));
    }
    use super::types::TaxClassification;
    if matches!(
        input.classification,
        TaxClassification::ZeroRated | TaxClassification::Exempt
    ) && input.tax_amount != 0
    {
        return Err(InvoiceError::InvalidClassification(format!(
            "{:?} invoices must carry zero tax",
            input.classification
        )));
    }
    Ok(())
}

fn validate_counterparty_tax_id(tax_id: Option<&str>) -> Result<(), InvoiceError> {
    match tax_id {
        None => Ok(()),
        Some(id) if id.len() == 8 && id.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        Some(id) => Err(InvoiceError::Validation(format!(
            "counterparty tax id must be exactly 8 digits, got {id:?}"
        ))),
    }
}

fn map_store_error(err: StoreError) -> InvoiceError {
    match err {
        StoreError::UniqueViolation(msg) => InvoiceError::DuplicateNumber(msg),
        StoreError::PreconditionFailed(msg) => InvoiceError::InvalidState(msg),
        other => InvoiceError::Store(other),
    }
}
