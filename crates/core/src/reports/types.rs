//! Report data types. All derived, never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabula_shared::types::AccountId;

use crate::account::AccountType;
use crate::fiscal::BiMonth;
use crate::invoice::Invoice;

/// One account row in a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account identifier.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of debits hitting this account.
    pub debit_total: Decimal,
    /// Sum of credits hitting this account.
    pub credit_total: Decimal,
    /// `debit_total - credit_total`.
    pub balance: Decimal,
}

/// Trial balance over all posted activity through a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report cut-off date (inclusive).
    pub as_of: NaiveDate,
    /// Per-account rows, ordered by account code. Inactive accounts are
    /// omitted.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debit totals.
    pub total_debit: Decimal,
    /// Sum of all credit totals.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

/// One line in a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account identifier.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Section-normal amount (revenue and liability lines are
    /// credit-normal, expense and asset lines debit-normal).
    pub amount: Decimal,
}

/// A titled group of report lines with its total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section lines, ordered by account code.
    pub lines: Vec<ReportLine>,
    /// Sum of line amounts.
    pub total: Decimal,
}

impl ReportSection {
    pub(crate) fn from_lines(mut lines: Vec<ReportLine>) -> Self {
        lines.sort_by(|a, b| a.code.cmp(&b.code));
        let total = lines.iter().map(|l| l.amount).sum();
        Self { lines, total }
    }
}

/// Income statement over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Range start (inclusive).
    pub from: NaiveDate,
    /// Range end (inclusive).
    pub to: NaiveDate,
    /// Revenue accounts.
    pub revenue: ReportSection,
    /// Expense accounts.
    pub expenses: ReportSection,
    /// `revenue.total - expenses.total`.
    pub net_income: Decimal,
}

/// Balance sheet as of a date.
///
/// Current earnings (revenue minus expense to date) are folded into the
/// equity section so the accounting equation holds whenever every entry
/// in the books balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report cut-off date (inclusive).
    pub as_of: NaiveDate,
    /// Asset accounts (debit-normal amounts).
    pub assets: ReportSection,
    /// Liability accounts (credit-normal amounts).
    pub liabilities: ReportSection,
    /// Equity accounts plus the current-earnings line.
    pub equity: ReportSection,
    /// Revenue minus expense to date, shown inside `equity`.
    pub current_earnings: Decimal,
    /// Whether `assets.total == liabilities.total + equity.total`.
    pub is_balanced: bool,
}

/// Invoices and totals for one tax classification within a period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxBucket {
    /// The bucketed invoices.
    pub invoices: Vec<Invoice>,
    /// Invoice count.
    pub count: usize,
    /// Sum of untaxed amounts, minor units.
    pub untaxed_total: i64,
    /// Sum of tax amounts, minor units.
    pub tax_total: i64,
}

impl TaxBucket {
    pub(crate) fn push(&mut self, invoice: Invoice) {
        self.untaxed_total += invoice.untaxed_amount;
        self.tax_total += invoice.tax_amount;
        self.count += 1;
        self.invoices.push(invoice);
    }
}

/// Posted invoices of one bi-month, bucketed by tax classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxPeriodSummary {
    /// The filing period.
    pub period: BiMonth,
    /// Standard-rated sales.
    pub taxable: TaxBucket,
    /// Zero-rated (export) sales.
    pub zero_rated: TaxBucket,
    /// Exempt sales.
    pub exempt: TaxBucket,
    /// Purchases with recoverable tax.
    pub deductible: TaxBucket,
    /// Purchases with expensed tax.
    pub non_deductible: TaxBucket,
}

impl TaxPeriodSummary {
    pub(crate) fn empty(period: BiMonth) -> Self {
        Self {
            period,
            taxable: TaxBucket::default(),
            zero_rated: TaxBucket::default(),
            exempt: TaxBucket::default(),
            deductible: TaxBucket::default(),
            non_deductible: TaxBucket::default(),
        }
    }

    /// All posted invoices of the period, sales buckets first.
    #[must_use]
    pub fn all_invoices(&self) -> Vec<&Invoice> {
        self.taxable
            .invoices
            .iter()
            .chain(&self.zero_rated.invoices)
            .chain(&self.exempt.invoices)
            .chain(&self.deductible.invoices)
            .chain(&self.non_deductible.invoices)
            .collect()
    }
}
