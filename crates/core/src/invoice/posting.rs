//! Posting derivation: invoice -> balanced journal lines.
//!
//! Output invoices debit Accounts Receivable for the total and credit
//! Revenue (untaxed) plus VAT Payable (tax). Deductible input invoices
//! debit Purchases (untaxed) and VAT Receivable (tax) and credit Accounts
//! Payable for the total. Non-deductible input invoices expense the tax:
//! the full total is debited to Purchases. Zero-tax lines are omitted
//! rather than emitted with a zero amount.

use rust_decimal::Decimal;

use crate::account::{ChartOfAccounts, SystemAccount};
use crate::journal::types::LineInput;

use super::error::InvoiceError;
use super::types::{Invoice, InvoiceType, TaxClassification};

/// Derives the journal lines an invoice posts with.
///
/// Pure; the caller wraps the lines in an entry and commits.
///
/// # Errors
///
/// Returns [`InvoiceError::Validation`] if the chart is missing a required
/// system account, or [`InvoiceError::InvalidClassification`] for a
/// classification incompatible with the invoice type.
pub fn derive_posting(
    invoice: &Invoice,
    chart: &ChartOfAccounts,
) -> Result<Vec<LineInput>, InvoiceError> {
    if !invoice.classification.valid_for(invoice.invoice_type) {
        return Err(InvoiceError::InvalidClassification(format!(
            "{:?} is not valid for {:?} invoices",
            invoice.classification, invoice.invoice_type
        )));
    }

    let untaxed = Decimal::from(invoice.untaxed_amount);
    let tax = Decimal::from(invoice.tax_amount);
    let total = Decimal::from(invoice.total_amount);

    let mut lines = Vec::with_capacity(3);
    match invoice.invoice_type {
        InvoiceType::Output => {
            lines.push(LineInput::debit(
                account(chart, SystemAccount::AccountsReceivable)?,
                total,
            ));
            lines.push(LineInput::credit(
                account(chart, SystemAccount::SalesRevenue)?,
                untaxed,
            ));
            if tax > Decimal::ZERO {
                lines.push(LineInput::credit(
                    account(chart, SystemAccount::VatPayable)?,
                    tax,
                ));
            }
        }
        InvoiceType::Input => {
            if invoice.classification == TaxClassification::Deductible && tax > Decimal::ZERO {
                lines.push(LineInput::debit(
                    account(chart, SystemAccount::Purchases)?,
                    untaxed,
                ));
                lines.push(LineInput::debit(
                    account(chart, SystemAccount::VatReceivable)?,
                    tax,
                ));
            } else {
                // Non-deductible tax is part of the expense.
                lines.push(LineInput::debit(
                    account(chart, SystemAccount::Purchases)?,
                    total,
                ));
            }
            lines.push(LineInput::credit(
                account(chart, SystemAccount::AccountsPayable)?,
                total,
            ));
        }
    }

    Ok(lines)
}

/// Derives the settlement lines for a payment against a posted invoice.
///
/// Output invoices collect cash (debit Cash, credit AR); input invoices
/// disburse it (debit AP, credit Cash).
///
/// # Errors
///
/// Returns [`InvoiceError::Validation`] if the chart is missing a required
/// system account.
pub fn derive_settlement(
    invoice: &Invoice,
    chart: &ChartOfAccounts,
    amount: i64,
) -> Result<Vec<LineInput>, InvoiceError> {
    let amount = Decimal::from(amount);
    let lines = match invoice.invoice_type {
        InvoiceType::Output => vec![
            LineInput::debit(account(chart, SystemAccount::CashAndBank)?, amount),
            LineInput::credit(account(chart, SystemAccount::AccountsReceivable)?, amount),
        ],
        InvoiceType::Input => vec![
            LineInput::debit(account(chart, SystemAccount::AccountsPayable)?, amount),
            LineInput::credit(account(chart, SystemAccount::CashAndBank)?, amount),
        ],
    };
    Ok(lines)
}

fn account(
    chart: &ChartOfAccounts,
    sys: SystemAccount,
) -> Result<tabula_shared::types::AccountId, InvoiceError> {
    chart
        .system(sys)
        .map(|a| a.id)
        .ok_or_else(|| InvoiceError::Validation(format!("chart is missing account {sys}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::types::InvoiceStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use tabula_shared::types::{CompanyId, InvoiceId, UserId};

    fn chart() -> ChartOfAccounts {
        ChartOfAccounts::from_accounts(ChartOfAccounts::standard(CompanyId::new()))
    }

    fn invoice(
        invoice_type: InvoiceType,
        classification: TaxClassification,
        untaxed: i64,
        tax: i64,
    ) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            company_id: CompanyId::new(),
            number: "AB12345678".into(),
            invoice_type,
            status: InvoiceStatus::Verified,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            untaxed_amount: untaxed,
            tax_amount: tax,
            total_amount: untaxed + tax,
            counterparty_name: "Acme".into(),
            counterparty_tax_id: Some("11223344".into()),
            description: "goods".into(),
            due_date: None,
            journal_entry_id: None,
            classification,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sum_sides(lines: &[LineInput]) -> (Decimal, Decimal) {
        lines.iter().fold((dec!(0), dec!(0)), |(d, c), l| {
            (d + l.debit, c + l.credit)
        })
    }

    #[test]
    fn test_output_taxable_posting() {
        let chart = chart();
        let inv = invoice(InvoiceType::Output, TaxClassification::Taxable, 10000, 500);
        let lines = derive_posting(&inv, &chart).unwrap();

        assert_eq!(lines.len(), 3);
        let (debit, credit) = sum_sides(&lines);
        assert_eq!(debit, dec!(10500));
        assert_eq!(credit, dec!(10500));

        let ar = chart.system(SystemAccount::AccountsReceivable).unwrap().id;
        assert!(lines.iter().any(|l| l.account_id == ar && l.debit == dec!(10500)));
    }

    #[test]
    fn test_output_exempt_omits_tax_line() {
        let chart = chart();
        let inv = invoice(InvoiceType::Output, TaxClassification::Exempt, 10000, 0);
        let lines = derive_posting(&inv, &chart).unwrap();

        assert_eq!(lines.len(), 2);
        let vat = chart.system(SystemAccount::VatPayable).unwrap().id;
        assert!(lines.iter().all(|l| l.account_id != vat));
    }

    #[test]
    fn test_input_deductible_splits_tax() {
        let chart = chart();
        let inv = invoice(InvoiceType::Input, TaxClassification::Deductible, 20000, 1000);
        let lines = derive_posting(&inv, &chart).unwrap();

        assert_eq!(lines.len(), 3);
        let vat_recv = chart.system(SystemAccount::VatReceivable).unwrap().id;
        let purchases = chart.system(SystemAccount::Purchases).unwrap().id;
        assert!(lines
            .iter()
            .any(|l| l.account_id == vat_recv && l.debit == dec!(1000)));
        assert!(lines
            .iter()
            .any(|l| l.account_id == purchases && l.debit == dec!(20000)));
    }

    #[test]
    fn test_input_non_deductible_expenses_tax() {
        let chart = chart();
        let inv = invoice(
            InvoiceType::Input,
            TaxClassification::NonDeductible,
            20000,
            1000,
        );
        let lines = derive_posting(&inv, &chart).unwrap();

        assert_eq!(lines.len(), 2);
        let purchases = chart.system(SystemAccount::Purchases).unwrap().id;
        let vat_recv = chart.system(SystemAccount::VatReceivable).unwrap().id;
        assert!(lines
            .iter()
            .any(|l| l.account_id == purchases && l.debit == dec!(21000)));
        assert!(lines.iter().all(|l| l.account_id != vat_recv));
    }

    #[test]
    fn test_mismatched_classification_rejected() {
        let chart = chart();
        let inv = invoice(InvoiceType::Output, TaxClassification::Deductible, 100, 5);
        assert!(matches!(
            derive_posting(&inv, &chart),
            Err(InvoiceError::InvalidClassification(_))
        ));
    }

    #[test]
    fn test_settlement_directions() {
        let chart = chart();
        let cash = chart.system(SystemAccount::CashAndBank).unwrap().id;

        let out = invoice(InvoiceType::Output, TaxClassification::Taxable, 100, 5);
        let lines = derive_settlement(&out, &chart, 105).unwrap();
        assert!(lines.iter().any(|l| l.account_id == cash && l.debit == dec!(105)));

        let inp = invoice(InvoiceType::Input, TaxClassification::Deductible, 100, 5);
        let lines = derive_settlement(&inp, &chart, 105).unwrap();
        assert!(lines.iter().any(|l| l.account_id == cash && l.credit == dec!(105)));
    }
}
