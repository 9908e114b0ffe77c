//! Account definitions for the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tallybook_common::{Amount, CoreError, CurrencyRef, Result};

use crate::collation::collation_key;
use crate::error::LedgerError;

/// Account classification.
///
/// In double-entry bookkeeping:
/// - Asset and expense accounts have a debit normal balance
/// - Liability and income accounts have a credit normal balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Something owned: cash, bank accounts, investments.
    Asset,
    /// Something owed: loans, credit cards.
    Liability,
    /// Money coming in: salary, interest.
    Income,
    /// Money going out: rent, groceries.
    Expense,
}

/// Sign convention under which an account's increases are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Increases are positive in raw ledger terms.
    Debit,
    /// Increases are negative in raw ledger terms.
    Credit,
}

impl AccountType {
    /// All account types, in display order.
    pub const ALL: [AccountType; 4] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Income,
        AccountType::Expense,
    ];

    /// Get the normal balance of this type.
    pub fn normal_balance(self) -> NormalBalance {
        match self {
            AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
            AccountType::Liability | AccountType::Income => NormalBalance::Credit,
        }
    }

    /// Check if increases are recorded as debits.
    pub fn is_debit(self) -> bool {
        self.normal_balance() == NormalBalance::Debit
    }

    /// Check if increases are recorded as credits.
    pub fn is_credit(self) -> bool {
        self.normal_balance() == NormalBalance::Credit
    }

    /// Check if balances are point-in-time (balance sheet).
    pub fn is_balance_sheet(self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Liability)
    }

    /// Check if balances accumulate over a period (income statement).
    pub fn is_income_statement(self) -> bool {
        matches!(self, AccountType::Income | AccountType::Expense)
    }

    /// Get the lowercase type name.
    pub fn name(self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        AccountType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LedgerError::UnknownAccountType(s.to_string()))
    }
}

/// A named ledger bucket.
///
/// The type is fixed at construction because it defines the sign
/// convention of every amount recorded against the account. Name
/// uniqueness is enforced by the owning [`AccountBook`](crate::AccountBook).
///
/// `Clone` deep-copies every owned string and shares the currency handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    account_type: AccountType,
    currency: CurrencyRef,
    name: String,
    name_key: String,
    reference: Option<String>,
    groupname: Option<String>,
    account_number: Option<String>,
    notes: Option<String>,
    inactive: bool,
    autocreated: bool,
}

impl Account {
    /// Create a new account.
    pub fn new(name: &str, currency: CurrencyRef, account_type: AccountType) -> Result<Self> {
        let name = normalize_name(name)?;
        Ok(Self {
            account_type,
            currency,
            name_key: collation_key(&name),
            name,
            reference: None,
            groupname: None,
            account_number: None,
            notes: None,
            inactive: false,
            autocreated: false,
        })
    }

    /// Get the account type.
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Get the lowercase type name (`"asset"`, `"liability"`, ...).
    pub fn type_name(&self) -> &'static str {
        self.account_type.name()
    }

    /// Check if the account has a debit normal balance.
    pub fn is_debit(&self) -> bool {
        self.account_type.is_debit()
    }

    /// Check if the account has a credit normal balance.
    pub fn is_credit(&self) -> bool {
        self.account_type.is_credit()
    }

    /// Check if the account belongs to the balance sheet.
    pub fn is_balance_sheet(&self) -> bool {
        self.account_type.is_balance_sheet()
    }

    /// Check if the account belongs to the income statement.
    pub fn is_income_statement(&self) -> bool {
        self.account_type.is_income_statement()
    }

    /// Turn a raw ledger amount into a display amount where an economic
    /// increase is positive.
    ///
    /// Debit accounts keep the sign, credit accounts flip it. The amount's
    /// currency is kept as is and is not checked against the account's
    /// default currency: an account may hold entries in several currencies.
    pub fn normalize_amount(&self, amount: &Amount) -> Amount {
        match self.account_type.normal_balance() {
            NormalBalance::Debit => amount.clone(),
            NormalBalance::Credit => amount.negate(),
        }
    }

    /// Get the default currency.
    pub fn currency(&self) -> &CurrencyRef {
        &self.currency
    }

    /// Change the default currency. Only affects display.
    pub fn set_currency(&mut self, currency: CurrencyRef) {
        self.currency = currency;
    }

    /// Get the account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the collation key of the name.
    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    /// Rename the account, refreshing its collation key.
    ///
    /// Accounts held by an [`AccountBook`](crate::AccountBook) are renamed
    /// through [`AccountBook::rename`](crate::AccountBook::rename).
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        self.name_key = collation_key(&name);
        self.name = name;
        Ok(())
    }

    /// Get the external reference, e.g. a bank's account identifier.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Set or clear the external reference. Blank text clears it.
    pub fn set_reference(&mut self, reference: Option<&str>) {
        self.reference = normalize_optional_text(reference);
    }

    /// Get the group this account is filed under.
    pub fn groupname(&self) -> Option<&str> {
        self.groupname.as_deref()
    }

    /// Set or clear the group. Blank text clears it.
    pub fn set_groupname(&mut self, groupname: Option<&str>) {
        self.groupname = normalize_optional_text(groupname);
    }

    /// Get the user-assigned account number.
    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    /// Set or clear the account number. Blank text clears it.
    pub fn set_account_number(&mut self, account_number: Option<&str>) {
        self.account_number = normalize_optional_text(account_number);
    }

    /// Get the freeform notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Set or clear the notes, trimmed. Blank text clears them.
    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.notes = normalize_optional_text(notes);
    }

    /// Inactive accounts are hidden from auto-completion.
    pub fn is_inactive(&self) -> bool {
        self.inactive
    }

    /// Mark the account inactive or active again.
    pub fn set_inactive(&mut self, inactive: bool) {
        self.inactive = inactive;
    }

    /// Autocreated accounts came from transaction editing and may be purged when unused.
    pub fn is_autocreated(&self) -> bool {
        self.autocreated
    }

    /// Flag the account as autocreated or user-made.
    pub fn set_autocreated(&mut self, autocreated: bool) {
        self.autocreated = autocreated;
    }

    /// Name prefixed by the account number, when there is one.
    pub fn combined_display(&self) -> String {
        match &self.account_number {
            Some(number) => format!("{} - {}", number, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn normalize_name(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
