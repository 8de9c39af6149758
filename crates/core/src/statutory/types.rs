//! Statutory filing data types.
//!
//! Amounts are integer minor currency units throughout; the government
//! formats carry no decimal point.

use serde::{Deserialize, Serialize};

use crate::fiscal::BiMonth;

/// Count and totals of one classification bucket, as filed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    /// Invoice count.
    pub count: usize,
    /// Sum of untaxed amounts.
    pub untaxed: i64,
    /// Sum of tax amounts.
    pub tax: i64,
}

/// Form 401: periodic VAT return for general taxpayers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form401Data {
    /// Filing entity's tax registration number.
    pub tax_registration_number: String,
    /// Filing period.
    pub period: BiMonth,
    /// Standard-rated sales.
    pub taxable_sales: BucketTotals,
    /// Zero-rated (export) sales.
    pub zero_rated_sales: BucketTotals,
    /// Purchases with recoverable tax.
    pub deductible_purchases: BucketTotals,
    /// Purchases with expensed tax.
    pub non_deductible_purchases: BucketTotals,
    /// Tax collected on taxable sales.
    pub output_tax: i64,
    /// Recoverable tax on deductible purchases.
    pub input_tax: i64,
    /// `output_tax - input_tax`; negative means a refund position.
    pub tax_payable: i64,
}

/// Form 403: periodic VAT return for taxpayers with exempt sales.
///
/// A superset of Form 401's figures plus the exempt sales bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form403Data {
    /// Filing entity's tax registration number.
    pub tax_registration_number: String,
    /// Filing period.
    pub period: BiMonth,
    /// Standard-rated sales.
    pub taxable_sales: BucketTotals,
    /// Zero-rated (export) sales.
    pub zero_rated_sales: BucketTotals,
    /// Exempt sales.
    pub exempt_sales: BucketTotals,
    /// Purchases with recoverable tax.
    pub deductible_purchases: BucketTotals,
    /// Purchases with expensed tax.
    pub non_deductible_purchases: BucketTotals,
    /// Tax collected on taxable sales.
    pub output_tax: i64,
    /// Recoverable tax on deductible purchases.
    pub input_tax: i64,
    /// `output_tax - input_tax`; negative means a refund position.
    pub tax_payable: i64,
}

/// Inputs for media-file generation.
#[derive(Debug, Clone)]
pub struct MediaFileOptions {
    /// Filing entity's tax registration number (names the file).
    pub tax_registration_number: String,
    /// Filing period.
    pub period: BiMonth,
}

/// A generated media file plus its summary metadata.
///
/// The body holds one fixed-width record per invoice with no trailing
/// summary line; the totals the paper forms cross-check against travel as
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    /// The file body.
    pub content: String,
    /// Total record count.
    pub record_count: usize,
    /// Output (sales) record count.
    pub output_count: usize,
    /// Input (purchase) record count.
    pub input_count: usize,
    /// Sum of output untaxed amounts.
    pub output_amount: i64,
    /// Sum of input untaxed amounts.
    pub input_amount: i64,
    /// Sum of output tax amounts.
    pub output_tax: i64,
    /// Sum of input tax amounts.
    pub input_tax: i64,
}
