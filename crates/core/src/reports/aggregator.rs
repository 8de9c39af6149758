//! Store-backed report aggregation.

use chrono::NaiveDate;

use crate::fiscal::{BiMonth, FiscalError};
use crate::store::{CompanyScopedStore, StoreError};

use super::service::ReportService;
use super::types::{BalanceSheetReport, IncomeStatementReport, TaxPeriodSummary};
use thiserror::Error;

/// Errors raised by report aggregation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid filing period.
    #[error(transparent)]
    Fiscal(#[from] FiscalError),

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Fiscal(_) => "INVALID_PERIOD",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Fiscal(_) => 400,
            Self::Store(e) => e.http_status_code(),
        }
    }
}

/// Read-only projections over one company's books.
///
/// Every method scans and folds; nothing here writes, so a failed or
/// repeated call has no effect on the books.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Posted invoices of the bi-month, bucketed by tax classification.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Fiscal`] for an invalid period index, or a
    /// store failure.
    pub async fn tax_summary(
        store: &dyn CompanyScopedStore,
        year: i32,
        bi_month: u8,
    ) -> Result<TaxPeriodSummary, ReportError> {
        let period = BiMonth::new(year, bi_month)?;
        let (from, to) = period.date_range();
        let invoices = store.invoices_between(from, to).await?;
        Ok(ReportService::tax_summary(period, &invoices))
    }

    /// Income statement over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns store failures only.
    pub async fn income_statement(
        store: &dyn CompanyScopedStore,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        let accounts = store.list_accounts().await?;
        let lines = store.posted_lines_between(from, to).await?;
        Ok(ReportService::income_statement(from, to, &accounts, &lines))
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns store failures only.
    pub async fn balance_sheet(
        store: &dyn CompanyScopedStore,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let accounts = store.list_accounts().await?;
        let lines = store.posted_lines_between(NaiveDate::MIN, as_of).await?;
        Ok(ReportService::balance_sheet(as_of, &accounts, &lines))
    }
}
