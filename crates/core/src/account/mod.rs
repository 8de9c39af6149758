//! Chart of accounts registry.
//!
//! Accounts are immutable reference data created at company setup and never
//! deleted once referenced. The registry offers code lookup plus the
//! well-known system accounts invoice posting writes to.

use serde::{Deserialize, Serialize};
use tabula_shared::types::{AccountId, CompanyId};

/// Account types following standard accounting categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned by the company.
    Asset,
    /// Obligations owed to others.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the side a balance of this type normally sits on.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// Normal balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (asset, expense).
    Debit,
    /// Credit-normal (liability, equity, revenue).
    Credit,
}

/// A chart of accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Company this account belongs to.
    pub company_id: CompanyId,
    /// Account code (e.g., "1200").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
}

/// Well-known accounts the invoice engine posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAccount {
    /// Cash and bank.
    CashAndBank,
    /// Accounts receivable.
    AccountsReceivable,
    /// VAT paid on purchases, recoverable.
    VatReceivable,
    /// Accounts payable.
    AccountsPayable,
    /// VAT collected on sales, owed to the authority.
    VatPayable,
    /// Owner's equity.
    OwnersEquity,
    /// Sales revenue.
    SalesRevenue,
    /// Purchases and expenses.
    Purchases,
}

impl SystemAccount {
    /// Account code this system account is seeded under.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CashAndBank => "1100",
            Self::AccountsReceivable => "1200",
            Self::VatReceivable => "1300",
            Self::AccountsPayable => "2100",
            Self::VatPayable => "2200",
            Self::OwnersEquity => "3100",
            Self::SalesRevenue => "4100",
            Self::Purchases => "5100",
        }
    }

    /// Human-readable account name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CashAndBank => "Cash and Bank",
            Self::AccountsReceivable => "Accounts Receivable",
            Self::VatReceivable => "VAT Receivable",
            Self::AccountsPayable => "Accounts Payable",
            Self::VatPayable => "VAT Payable",
            Self::OwnersEquity => "Owner's Equity",
            Self::SalesRevenue => "Sales Revenue",
            Self::Purchases => "Purchases",
        }
    }

    /// Account type of this system account.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::CashAndBank | Self::AccountsReceivable | Self::VatReceivable => {
                AccountType::Asset
            }
            Self::AccountsPayable | Self::VatPayable => AccountType::Liability,
            Self::OwnersEquity => AccountType::Equity,
            Self::SalesRevenue => AccountType::Revenue,
            Self::Purchases => AccountType::Expense,
        }
    }

    /// All system accounts, in code order.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::CashAndBank,
            Self::AccountsReceivable,
            Self::VatReceivable,
            Self::AccountsPayable,
            Self::VatPayable,
            Self::OwnersEquity,
            Self::SalesRevenue,
            Self::Purchases,
        ]
    }
}

impl std::fmt::Display for SystemAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// In-memory view of a company's chart of accounts.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
}

impl ChartOfAccounts {
    /// Builds a chart view from already-loaded accounts.
    #[must_use]
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Seeds the standard chart for a new company.
    #[must_use]
    pub fn standard(company_id: CompanyId) -> Vec<Account> {
        SystemAccount::all()
            .into_iter()
            .map(|sys| Account {
                id: AccountId::new(),
                company_id,
                code: sys.code().to_string(),
                name: sys.name().to_string(),
                account_type: sys.account_type(),
                normal_balance: sys.account_type().normal_balance(),
            })
            .collect()
    }

    /// Looks up an account by code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.code == code)
    }

    /// Looks up a well-known system account.
    #[must_use]
    pub fn system(&self, sys: SystemAccount) -> Option<&Account> {
        self.by_code(sys.code())
    }

    /// All accounts in the chart.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}
