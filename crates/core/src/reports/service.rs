//! Pure report folds over already-loaded rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tabula_shared::types::AccountId;

use crate::account::{Account, AccountType};
use crate::fiscal::BiMonth;
use crate::invoice::{Invoice, InvoiceStatus, InvoiceType, TaxClassification};
use crate::journal::types::TransactionLine;

use super::types::{
    BalanceSheetReport, IncomeStatementReport, ReportLine, ReportSection, TaxPeriodSummary,
    TrialBalanceReport, TrialBalanceRow,
};

/// Per-account debit/credit accumulator.
#[derive(Debug, Default, Clone, Copy)]
struct Activity {
    debit: Decimal,
    credit: Decimal,
}

/// Pure grouping layer behind the aggregator.
pub struct ReportService;

impl ReportService {
    /// Folds posted lines into a trial balance.
    ///
    /// Accounts with no activity are omitted. The zero-sum property holds
    /// whenever every folded entry balances.
    #[must_use]
    pub fn trial_balance(
        as_of: NaiveDate,
        accounts: &[Account],
        lines: &[TransactionLine],
    ) -> TrialBalanceReport {
        let activity = fold_activity(lines);

        let mut rows: Vec<TrialBalanceRow> = accounts
            .iter()
            .filter_map(|account| {
                let a = activity.get(&account.id)?;
                Some(TrialBalanceRow {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    debit_total: a.debit,
                    credit_total: a.credit,
                    balance: a.debit - a.credit,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = rows.iter().map(|r| r.debit_total).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit_total).sum();

        TrialBalanceReport {
            as_of,
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Folds posted lines into an income statement for `[from, to]`.
    #[must_use]
    pub fn income_statement(
        from: NaiveDate,
        to: NaiveDate,
        accounts: &[Account],
        lines: &[TransactionLine],
    ) -> IncomeStatementReport {
        let activity = fold_activity(lines);

        let revenue = section_of(accounts, &activity, AccountType::Revenue, Side::Credit);
        let expenses = section_of(accounts, &activity, AccountType::Expense, Side::Debit);
        let net_income = revenue.total - expenses.total;

        IncomeStatementReport {
            from,
            to,
            revenue,
            expenses,
            net_income,
        }
    }

    /// Folds posted lines into a balance sheet as of a date.
    #[must_use]
    pub fn balance_sheet(
        as_of: NaiveDate,
        accounts: &[Account],
        lines: &[TransactionLine],
    ) -> BalanceSheetReport {
        let activity = fold_activity(lines);

        let assets = section_of(accounts, &activity, AccountType::Asset, Side::Debit);
        let liabilities = section_of(accounts, &activity, AccountType::Liability, Side::Credit);
        let mut equity = section_of(accounts, &activity, AccountType::Equity, Side::Credit);

        let revenue = section_of(accounts, &activity, AccountType::Revenue, Side::Credit);
        let expenses = section_of(accounts, &activity, AccountType::Expense, Side::Debit);
        let current_earnings = revenue.total - expenses.total;

        equity.total += current_earnings;

        let is_balanced = assets.total == liabilities.total + equity.total;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            is_balanced,
        }
    }

    /// Buckets the period's `Posted` invoices by tax classification.
    ///
    /// Invoices outside the period window or in any other status are
    /// ignored.
    #[must_use]
    pub fn tax_summary(period: BiMonth, invoices: &[Invoice]) -> TaxPeriodSummary {
        let mut summary = TaxPeriodSummary::empty(period);

        for invoice in invoices {
            if invoice.status != InvoiceStatus::Posted || !period.contains(invoice.date) {
                continue;
            }
            let bucket = match (invoice.invoice_type, invoice.classification) {
                (InvoiceType::Output, TaxClassification::Taxable) => &mut summary.taxable,
                (InvoiceType::Output, TaxClassification::ZeroRated) => &mut summary.zero_rated,
                (InvoiceType::Output, TaxClassification::Exempt) => &mut summary.exempt,
                (InvoiceType::Input, TaxClassification::Deductible) => &mut summary.deductible,
                (InvoiceType::Input, TaxClassification::NonDeductible) => {
                    &mut summary.non_deductible
                }
                // Creation-time validation makes other pairings unreachable.
                _ => continue,
            };
            bucket.push(invoice.clone());
        }

        summary
    }
}

enum Side {
    Debit,
    Credit,
}

fn fold_activity(lines: &[TransactionLine]) -> HashMap<AccountId, Activity> {
    let mut activity: HashMap<AccountId, Activity> = HashMap::new();
    for line in lines {
        let entry = activity.entry(line.account_id).or_default();
        entry.debit += line.debit;
        entry.credit += line.credit;
    }
    activity
}

fn section_of(
    accounts: &[Account],
    activity: &HashMap<AccountId, Activity>,
    account_type: AccountType,
    side: Side,
) -> ReportSection {
    let lines = accounts
        .iter()
        .filter(|a| a.account_type == account_type)
        .filter_map(|account| {
            let a = activity.get(&account.id)?;
            let amount = match side {
                Side::Debit => a.debit - a.credit,
                Side::Credit => a.credit - a.debit,
            };
            Some(ReportLine {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                amount,
            })
        })
        .collect();
    ReportSection::from_lines(lines)
}
