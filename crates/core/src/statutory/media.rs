//! Government media-file generation.
//!
//! One fixed-width record per posted invoice in the filing period,
//! newline-terminated, no header and no trailing summary line. Dates use
//! the ROC calendar (western year minus 1911). Column widths and record
//! markers live here as constants; a corrected authority layout is a
//! constants-only change.

use chrono::Datelike;

use crate::invoice::{Invoice, InvoiceStatus, InvoiceType, TaxClassification};

use super::types::{MediaFile, MediaFileOptions};

/// Record type marker for output (sales) invoices.
pub const RECORD_TYPE_OUTPUT: &str = "31";
/// Record type marker for input (purchase) invoices.
pub const RECORD_TYPE_INPUT: &str = "25";

/// Width of the record type marker.
pub const WIDTH_RECORD_TYPE: usize = 2;
/// Width of the invoice number column.
pub const WIDTH_INVOICE_NUMBER: usize = 10;
/// Width of the ROC date column (`YYYMMDD`).
pub const WIDTH_DATE: usize = 7;
/// Width of the counterparty tax id column.
pub const WIDTH_TAX_ID: usize = 8;
/// Width of the untaxed amount column.
pub const WIDTH_UNTAXED: usize = 12;
/// Width of the tax amount column.
pub const WIDTH_TAX: usize = 10;
/// Width of the deductibility marker column.
pub const WIDTH_MARKER: usize = 1;

/// Total record length, excluding the newline.
pub const RECORD_LENGTH: usize = WIDTH_RECORD_TYPE
    + WIDTH_INVOICE_NUMBER
    + WIDTH_DATE
    + WIDTH_TAX_ID
    + WIDTH_UNTAXED
    + WIDTH_TAX
    + WIDTH_MARKER;

/// Formats a date as ROC-calendar `YYYMMDD`.
#[must_use]
pub fn roc_date(date: chrono::NaiveDate) -> String {
    let roc_year = date.year() - 1911;
    format!("{roc_year:03}{:02}{:02}", date.month(), date.day())
}

/// Encodes one invoice as a fixed-width record (no newline).
#[must_use]
pub fn encode_record(invoice: &Invoice) -> String {
    let record_type = match invoice.invoice_type {
        InvoiceType::Output => RECORD_TYPE_OUTPUT,
        InvoiceType::Input => RECORD_TYPE_INPUT,
    };
    let tax_id = invoice.counterparty_tax_id.as_deref().map_or_else(
        || " ".repeat(WIDTH_TAX_ID),
        |id| format!("{id:0>WIDTH_TAX_ID$}"),
    );
    let marker = match invoice.classification {
        TaxClassification::Deductible => '1',
        TaxClassification::NonDeductible => '2',
        TaxClassification::Taxable | TaxClassification::ZeroRated | TaxClassification::Exempt => {
            ' '
        }
    };

    format!(
        "{record_type}{:<WIDTH_INVOICE_NUMBER$}{}{tax_id}{:0>WIDTH_UNTAXED$}{:0>WIDTH_TAX$}{marker}",
        invoice.number,
        roc_date(invoice.date),
        invoice.untaxed_amount,
        invoice.tax_amount,
    )
}

/// Generates the media file for one filing period.
///
/// Only `Posted` invoices dated inside the period are written; records
/// appear in the order the invoices were given. Summary figures the paper
/// forms cross-check against are returned as metadata, never appended to
/// the body.
#[must_use]
pub fn generate_media_file(invoices: &[Invoice], options: &MediaFileOptions) -> MediaFile {
    let mut content = String::new();
    let mut output_count = 0;
    let mut input_count = 0;
    let mut output_amount = 0i64;
    let mut input_amount = 0i64;
    let mut output_tax = 0i64;
    let mut input_tax = 0i64;

    for invoice in invoices {
        if invoice.status != InvoiceStatus::Posted || !options.period.contains(invoice.date) {
            continue;
        }
        content.push_str(&encode_record(invoice));
        content.push('\n');

        match invoice.invoice_type {
            InvoiceType::Output => {
                output_count += 1;
                output_amount += invoice.untaxed_amount;
                output_tax += invoice.tax_amount;
            }
            InvoiceType::Input => {
                input_count += 1;
                input_amount += invoice.untaxed_amount;
                input_tax += invoice.tax_amount;
            }
        }
    }

    MediaFile {
        content,
        record_count: output_count + input_count,
        output_count,
        input_count,
        output_amount,
        input_amount,
        output_tax,
        input_tax,
    }
}

/// File name the government system expects: `{tax_id}.TXT`.
#[must_use]
pub fn media_file_name(tax_registration_number: &str) -> String {
    format!("{tax_registration_number}.TXT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::BiMonth;
    use chrono::{NaiveDate, Utc};
    use tabula_shared::types::{CompanyId, InvoiceId, JournalEntryId, UserId};

    fn invoice(
        invoice_type: InvoiceType,
        classification: TaxClassification,
        tax_id: Option<&str>,
        untaxed: i64,
        tax: i64,
    ) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            company_id: CompanyId::new(),
            number: "AB12345678".into(),
            invoice_type,
            status: InvoiceStatus::Posted,
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            untaxed_amount: untaxed,
            tax_amount: tax,
            total_amount: untaxed + tax,
            counterparty_name: "Acme".into(),
            counterparty_tax_id: tax_id.map(str::to_string),
            description: String::new(),
            due_date: None,
            journal_entry_id: Some(JournalEntryId::new()),
            classification,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn options() -> MediaFileOptions {
        MediaFileOptions {
            tax_registration_number: "12345678".into(),
            period: BiMonth::new(2025, 2).unwrap(),
        }
    }

    #[test]
    fn test_record_length() {
        assert_eq!(RECORD_LENGTH, 50);
        let record = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            Some("11223344"),
            10000,
            500,
        ));
        assert_eq!(record.len(), RECORD_LENGTH);
    }

    #[test]
    fn test_record_type_field() {
        let out = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            1,
            0,
        ));
        assert_eq!(&out[..2], "31");

        let inp = encode_record(&invoice(
            InvoiceType::Input,
            TaxClassification::Deductible,
            None,
            1,
            0,
        ));
        assert_eq!(&inp[..2], "25");
    }

    #[test]
    fn test_invoice_number_field() {
        let record = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            1,
            0,
        ));
        assert_eq!(&record[2..12], "AB12345678");
    }

    #[test]
    fn test_roc_date_field() {
        assert_eq!(roc_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()), "1140315");
        assert_eq!(roc_date(NaiveDate::from_ymd_opt(2011, 1, 5).unwrap()), "1000105");
        // Pre-2011 ROC years still occupy three characters.
        assert_eq!(roc_date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()), "0881231");

        let record = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            1,
            0,
        ));
        assert_eq!(&record[12..19], "1140315");
    }

    #[test]
    fn test_tax_id_field_padded_or_blank() {
        let with_id = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            Some("11223344"),
            1,
            0,
        ));
        assert_eq!(&with_id[19..27], "11223344");

        let without = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            1,
            0,
        ));
        assert_eq!(&without[19..27], "        ");
    }

    #[test]
    fn test_amount_fields_zero_padded() {
        let record = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            10000,
            500,
        ));
        assert_eq!(&record[27..39], "000000010000");
        assert_eq!(&record[39..49], "0000000500");
    }

    #[test]
    fn test_deductibility_marker() {
        let ded = encode_record(&invoice(
            InvoiceType::Input,
            TaxClassification::Deductible,
            None,
            1,
            0,
        ));
        assert_eq!(&ded[49..50], "1");

        let non = encode_record(&invoice(
            InvoiceType::Input,
            TaxClassification::NonDeductible,
            None,
            1,
            0,
        ));
        assert_eq!(&non[49..50], "2");

        let out = encode_record(&invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            1,
            0,
        ));
        assert_eq!(&out[49..50], " ");
    }

    #[test]
    fn test_media_file_counts_and_sums() {
        let invoices = vec![
            invoice(
                InvoiceType::Output,
                TaxClassification::Taxable,
                Some("11223344"),
                10000,
                500,
            ),
            invoice(
                InvoiceType::Output,
                TaxClassification::ZeroRated,
                None,
                8000,
                0,
            ),
            invoice(
                InvoiceType::Input,
                TaxClassification::Deductible,
                Some("55667788"),
                4000,
                200,
            ),
        ];
        let file = generate_media_file(&invoices, &options());

        assert_eq!(file.record_count, 3);
        assert_eq!(file.output_count, 2);
        assert_eq!(file.input_count, 1);
        assert_eq!(file.output_amount, 18000);
        assert_eq!(file.output_tax, 500);
        assert_eq!(file.input_amount, 4000);
        assert_eq!(file.input_tax, 200);
        assert_eq!(file.content.lines().count(), 3);
        assert!(file.content.lines().all(|l| l.len() == RECORD_LENGTH));
        assert!(file.content.ends_with('\n'));
    }

    #[test]
    fn test_media_file_skips_out_of_period_and_non_posted() {
        let mut outside = invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            100,
            5,
        );
        outside.date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        let mut draft = invoice(
            InvoiceType::Output,
            TaxClassification::Taxable,
            None,
            100,
            5,
        );
        draft.status = InvoiceStatus::Draft;

        let file = generate_media_file(&[outside, draft], &options());
        assert_eq!(file.record_count, 0);
        assert!(file.content.is_empty());
    }

    #[test]
    fn test_media_file_name() {
        assert_eq!(media_file_name("12345678"), "12345678.TXT");
    }
}
