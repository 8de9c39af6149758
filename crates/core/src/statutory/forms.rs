//! Form 401/403 figure derivation.

use tabula_shared::FilingConfig;

use crate::reports::types::{TaxBucket, TaxPeriodSummary};

use super::types::{BucketTotals, Form401Data, Form403Data};

fn totals(bucket: &TaxBucket) -> BucketTotals {
    BucketTotals {
        count: bucket.count,
        untaxed: bucket.untaxed_total,
        tax: bucket.tax_total,
    }
}

/// Derives Form 401 figures from a period summary.
///
/// Output tax is the tax collected on standard-rated sales; input tax is
/// the recoverable tax on deductible purchases only. A negative
/// `tax_payable` is a refund position, reported as-is.
#[must_use]
pub fn generate_form_401(summary: &TaxPeriodSummary, config: &FilingConfig) -> Form401Data {
    let output_tax = summary.taxable.tax_total;
    let input_tax = summary.deductible.tax_total;

    Form401Data {
        tax_registration_number: config.tax_registration_number.clone(),
        period: summary.period,
        taxable_sales: totals(&summary.taxable),
        zero_rated_sales: totals(&summary.zero_rated),
        deductible_purchases: totals(&summary.deductible),
        non_deductible_purchases: totals(&summary.non_deductible),
        output_tax,
        input_tax,
        tax_payable: output_tax - input_tax,
    }
}

/// Derives Form 403 figures from a period summary.
///
/// Same computation as Form 401 plus the exempt sales bucket; exempt
/// sales carry no tax and do not change the payable figure.
#[must_use]
pub fn generate_form_403(summary: &TaxPeriodSummary, config: &FilingConfig) -> Form403Data {
    let output_tax = summary.taxable.tax_total;
    let input_tax = summary.deductible.tax_total;

    Form403Data {
        tax_registration_number: config.tax_registration_number.clone(),
        period: summary.period,
        taxable_sales: totals(&summary.taxable),
        zero_rated_sales: totals(&summary.zero_rated),
        exempt_sales: totals(&summary.exempt),
        deductible_purchases: totals(&summary.deductible),
        non_deductible_purchases: totals(&summary.non_deductible),
        output_tax,
        input_tax,
        tax_payable: output_tax - input_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::BiMonth;
    use crate::invoice::{InvoiceType, TaxClassification};
    use crate::reports::types::TaxPeriodSummary;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use tabula_shared::types::{CompanyId, InvoiceId, JournalEntryId, UserId};

    fn config() -> FilingConfig {
        FilingConfig {
            tax_registration_number: "12345678".into(),
            vat_rate: dec!(0.05),
        }
    }

    fn summary_with(
        taxable: (i64, i64),
        deductible: (i64, i64),
        exempt_untaxed: i64,
    ) -> TaxPeriodSummary {
        let period = BiMonth::new(2025, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mk = |t, c, untaxed, tax| crate::invoice::Invoice {
            id: InvoiceId::new(),
            company_id: CompanyId::new(),
            number: "AB12345678".into(),
            invoice_type: t,
            status: crate::invoice::InvoiceStatus::Posted,
            date,
            untaxed_amount: untaxed,
            tax_amount: tax,
            total_amount: untaxed + tax,
            counterparty_name: "Acme".into(),
            counterparty_tax_id: None,
            description: String::new(),
            due_date: None,
            journal_entry_id: Some(JournalEntryId::new()),
            classification: c,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut invoices = vec![
            mk(
                InvoiceType::Output,
                TaxClassification::Taxable,
                taxable.0,
                taxable.1,
            ),
            mk(
                InvoiceType::Input,
                TaxClassification::Deductible,
                deductible.0,
                deductible.1,
            ),
        ];
        if exempt_untaxed > 0 {
            invoices.push(mk(
                InvoiceType::Output,
                TaxClassification::Exempt,
                exempt_untaxed,
                0,
            ));
        }
        crate::reports::ReportService::tax_summary(period, &invoices)
    }

    #[test]
    fn test_form_401_payable() {
        let summary = summary_with((100_000, 5000), (40_000, 2000), 0);
        let form = generate_form_401(&summary, &config());

        assert_eq!(form.output_tax, 5000);
        assert_eq!(form.input_tax, 2000);
        assert_eq!(form.tax_payable, 3000);
        assert_eq!(form.taxable_sales.untaxed, 100_000);
        assert_eq!(form.tax_registration_number, "12345678");
    }

    #[test]
    fn test_form_401_refund_position_stays_negative() {
        let summary = summary_with((10_000, 500), (40_000, 2000), 0);
        let form = generate_form_401(&summary, &config());
        assert_eq!(form.tax_payable, -1500);
    }

    #[test]
    fn test_form_403_carries_exempt_sales() {
        let summary = summary_with((100_000, 5000), (40_000, 2000), 25_000);
        let form = generate_form_403(&summary, &config());

        assert_eq!(form.exempt_sales.untaxed, 25_000);
        assert_eq!(form.exempt_sales.tax, 0);
        // Exempt sales never move the payable figure.
        assert_eq!(form.tax_payable, 3000);
    }
}
