//! Invoice domain types.
//!
//! All monetary fields are integer minor currency units, matching the
//! government filing format downstream.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tabula_shared::types::{CompanyId, InvoiceId, JournalEntryId, PaymentId, UserId};

use super::error::InvoiceError;

/// Direction of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Sales invoice issued by the company.
    Output,
    /// Purchase invoice received by the company.
    Input,
}

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Editable.
    Draft,
    /// Confirmed against source documents; locked but not yet in the ledger.
    Verified,
    /// In the ledger via a linked journal entry.
    Posted,
    /// Terminal.
    Voided,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Verified => "verified",
            Self::Posted => "posted",
            Self::Voided => "voided",
        };
        write!(f, "{s}")
    }
}

/// Statutory tax classification of an invoice.
///
/// The first three apply to output invoices, the last two to input
/// invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxClassification {
    /// Standard-rated sale.
    Taxable,
    /// Export sale, taxed at zero percent.
    ZeroRated,
    /// Sale outside the scope of VAT.
    Exempt,
    /// Purchase whose tax is recoverable.
    Deductible,
    /// Purchase whose tax is expensed, not recovered.
    NonDeductible,
}

impl TaxClassification {
    /// Classifies an output invoice from its applied rate.
    ///
    /// A positive rate means taxable; a zero rate is zero-rated for exports
    /// and exempt otherwise.
    #[must_use]
    pub fn for_output(rate: rust_decimal::Decimal, is_export: bool) -> Self {
        if rate > rust_decimal::Decimal::ZERO {
            Self::Taxable
        } else if is_export {
            Self::ZeroRated
        } else {
            Self::Exempt
        }
    }

    /// Whether this classification is valid for the given invoice type.
    #[must_use]
    pub const fn valid_for(self, invoice_type: InvoiceType) -> bool {
        match invoice_type {
            InvoiceType::Output => {
                matches!(self, Self::Taxable | Self::ZeroRated | Self::Exempt)
            }
            InvoiceType::Input => matches!(self, Self::Deductible | Self::NonDeductible),
        }
    }
}

/// An AR or AP invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Company this invoice belongs to.
    pub company_id: CompanyId,
    /// Normalized invoice number (`LLDDDDDDDD`); unique per company.
    pub number: String,
    /// Direction.
    pub invoice_type: InvoiceType,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Invoice date.
    pub date: NaiveDate,
    /// Amount before tax, minor units.
    pub untaxed_amount: i64,
    /// Tax amount, minor units.
    pub tax_amount: i64,
    /// Total amount, minor units; always `untaxed + tax`.
    pub total_amount: i64,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Counterparty tax registration number, 8 digits when present.
    pub counterparty_tax_id: Option<String>,
    /// Description.
    pub description: String,
    /// Payment due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Journal entry created at posting.
    pub journal_entry_id: Option<JournalEntryId>,
    /// Statutory tax classification.
    pub classification: TaxClassification,
    /// User who created the invoice.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Outstanding balance given payments already recorded.
    #[must_use]
    pub fn outstanding(&self, paid: i64) -> i64 {
        self.total_amount - paid
    }
}

/// Input for creating or editing an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceInput {
    /// Invoice number; `LLDDDDDDDD` or `LL-DDDDDDDD`.
    pub number: String,
    /// Direction.
    pub invoice_type: InvoiceType,
    /// Invoice date.
    pub date: NaiveDate,
    /// Amount before tax, minor units.
    pub untaxed_amount: i64,
    /// Tax amount, minor units.
    pub tax_amount: i64,
    /// Total amount, minor units.
    pub total_amount: i64,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Counterparty tax registration number.
    pub counterparty_tax_id: Option<String>,
    /// Description.
    pub description: String,
    /// Payment due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Statutory tax classification.
    pub classification: TaxClassification,
    /// User creating the invoice.
    pub created_by: UserId,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Check.
    Check,
    /// Card.
    Card,
}

/// A payment recorded against a posted invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Invoice this payment settles (partially or fully).
    pub invoice_id: InvoiceId,
    /// Amount paid, minor units.
    pub amount: i64,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment method.
    pub method: PaymentMethod,
    /// External reference (transfer id, check number).
    pub reference: Option<String>,
    /// Settlement journal entry.
    pub journal_entry_id: JournalEntryId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Normalizes an invoice number to its canonical ten-character form.
///
/// Accepts `LLDDDDDDDD` or `LL-DDDDDDDD` where `L` is an uppercase ASCII
/// letter and `D` a digit.
///
/// # Errors
///
/// Returns [`InvoiceError::InvalidNumber`] for any other shape.
pub fn normalize_invoice_number(raw: &str) -> Result<String, InvoiceError> {
    let compact: String = if raw.len() == 11 && raw.as_bytes().get(2) == Some(&b'-') {
        format!("{}{}", &raw[..2], &raw[3..])
    } else {
        raw.to_string()
    };

    let bytes = compact.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit);

    if well_formed {
        Ok(compact)
    } else {
        Err(InvoiceError::InvalidNumber(raw.to_string()))
    }
}
