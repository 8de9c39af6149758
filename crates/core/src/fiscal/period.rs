//! Bi-monthly VAT filing periods.
//!
//! Filings cover two calendar months: period 1 is January-February, period 6
//! is November-December.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for fiscal period construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscalError {
    /// Bi-month index outside `1..=6`.
    #[error("Invalid bi-month index {0}; expected 1 through 6")]
    InvalidBiMonth(u8),
}

/// A two-month statutory filing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiMonth {
    year: i32,
    index: u8,
}

impl BiMonth {
    /// Creates a period for `year` and `index` in `1..=6`.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalError::InvalidBiMonth`] for an index outside `1..=6`.
    pub fn new(year: i32, index: u8) -> Result<Self, FiscalError> {
        if (1..=6).contains(&index) {
            Ok(Self { year, index })
        } else {
            Err(FiscalError::InvalidBiMonth(index))
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Period index, 1 through 6.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }

    /// First month of the period (1, 3, 5, 7, 9, 11).
    #[must_use]
    pub const fn start_month(self) -> u32 {
        (self.index as u32) * 2 - 1
    }

    /// Inclusive date range `[first day of start month, last day of the
    /// following month]`.
    #[must_use]
    pub fn date_range(self) -> (NaiveDate, NaiveDate) {
        let start_month = self.start_month();
        let start = NaiveDate::from_ymd_opt(self.year, start_month, 1)
            .unwrap_or(NaiveDate::MIN);

        // Last day of the second month = day before the first day of the
        // month after it.
        let (next_year, next_month) = if start_month + 2 > 12 {
            (self.year + 1, 1)
        } else {
            (self.year, start_month + 2)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .unwrap_or(NaiveDate::MAX)
            .pred_opt()
            .unwrap_or(NaiveDate::MAX);

        (start, end)
    }

    /// Whether `date` falls inside this period.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        let (start, end) = self.date_range();
        date >= start && date <= end
    }

    /// Human-readable label, e.g. `2025-P2 (Mar-Apr)`.
    #[must_use]
    pub fn label(self) -> String {
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let start = self.start_month() as usize;
        format!(
            "{}-P{} ({}-{})",
            self.year,
            self.index,
            MONTHS[start - 1],
            MONTHS[start]
        )
    }
}

impl std::fmt::Display for BiMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
