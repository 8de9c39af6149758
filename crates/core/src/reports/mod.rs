//! Read-only ledger projections.
//!
//! The fold layer ([`service::ReportService`]) is pure and operates on
//! already-loaded rows; [`aggregator::LedgerAggregator`] adds the store
//! I/O. Projections never write, so they are idempotent and retry-safe.

pub mod aggregator;
pub mod service;
pub mod types;


pub use aggregator::{LedgerAggregator, ReportError};
pub use service::ReportService;
pub use types::{
    BalanceSheetReport, IncomeStatementReport, ReportLine, ReportSection, TaxBucket,
    TaxPeriodSummary, TrialBalanceReport, TrialBalanceRow,
};
