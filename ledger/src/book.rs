//! Document-level account list.

use std::ops::Deref;

use tracing::{debug, info, instrument};

use tallybook_common::CurrencyRef;

use crate::account::{Account, AccountType};
use crate::collation::collation_key;
use crate::error::{LedgerError, LedgerResult};

/// Base used by [`AccountBook::new_name`] when the requested base is blank.
pub const DEFAULT_ACCOUNT_NAME: &str = "New account";

/// Owns every account of a document and keeps names unique under
/// case- and accent-insensitive comparison.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: Vec<Account>,
}

impl AccountBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account.
    #[instrument(skip(self, account), fields(name = %account.name()))]
    pub fn add(&mut self, account: Account) -> LedgerResult<()> {
        if self.position(account.name_key()).is_some() {
            return Err(LedgerError::DuplicateAccountName(account.name().to_string()));
        }
        info!(
            name = %account.name(),
            account_type = %account.account_type(),
            currency = %account.currency(),
            "Account added"
        );
        self.accounts.push(account);
        Ok(())
    }

    /// Find an account by name, ignoring case and accents.
    pub fn find_by_name(&self, name: &str) -> Option<&Account> {
        self.position(&collation_key(name)).map(|idx| &self.accounts[idx])
    }

    /// Get an editing handle for an account.
    ///
    /// The handle changes everything but the name, which only
    /// [`rename`](Self::rename) may touch.
    pub fn edit(&mut self, name: &str) -> Option<AccountEdit<'_>> {
        let idx = self.position(&collation_key(name))?;
        Some(AccountEdit {
            account: &mut self.accounts[idx],
        })
    }

    /// Find an account by its external reference.
    pub fn find_by_reference(&self, reference: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.reference() == Some(reference))
    }

    /// Find an account by its account number.
    pub fn find_by_number(&self, number: &str) -> Option<&Account> {
        let number = number.trim();
        self.accounts.iter().find(|a| a.account_number() == Some(number))
    }

    /// Rename an account.
    ///
    /// Changing only the case or accents of a name is allowed. Taking the name
    /// of another account is not.
    #[instrument(skip(self))]
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> LedgerResult<()> {
        let idx = self
            .position(&collation_key(old_name))
            .ok_or_else(|| LedgerError::AccountNotFound(old_name.to_string()))?;

        let new_key = collation_key(new_name);
        if let Some(other) = self.position(&new_key) {
            if other != idx {
                return Err(LedgerError::DuplicateAccountName(new_name.to_string()));
            }
        }

        self.accounts[idx].set_name(new_name)?;
        info!(from = old_name, to = %self.accounts[idx].name(), "Account renamed");
        Ok(())
    }

    /// Remove an account, returning it.
    #[instrument(skip(self))]
    pub fn remove(&mut self, name: &str) -> LedgerResult<Account> {
        let idx = self
            .position(&collation_key(name))
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))?;
        let account = self.accounts.remove(idx);
        info!(name = %account.name(), "Account removed");
        Ok(account)
    }

    /// Drop autocreated accounts for which `is_used` returns false.
    ///
    /// Returns the removed accounts.
    pub fn purge_autocreated<F>(&mut self, mut is_used: F) -> Vec<Account>
    where
        F: FnMut(&Account) -> bool,
    {
        let (purged, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.accounts)
            .into_iter()
            .partition(|a| a.is_autocreated() && !is_used(a));
        self.accounts = kept;
        if !purged.is_empty() {
            info!(count = purged.len(), "Purged unused autocreated accounts");
        }
        purged
    }

    /// Get a name based on `base` that no account uses yet.
    ///
    /// Tries `base` first, then `base 1`, `base 2` and so on.
    pub fn new_name(&self, base: &str) -> String {
        let base = match base.trim() {
            "" => DEFAULT_ACCOUNT_NAME,
            trimmed => trimmed,
        };
        if self.find_by_name(base).is_none() {
            return base.to_string();
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{} {}", base, n);
            if self.find_by_name(&candidate).is_none() {
                debug!(base, candidate = %candidate, "Generated unique account name");
                return candidate;
            }
            n += 1;
        }
    }

    /// Iterate accounts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Iterate accounts of one type.
    pub fn accounts_of_type(&self, account_type: AccountType) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(move |a| a.account_type() == account_type)
    }

    /// Get the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the book has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.name_key() == key)
    }
}

/// Mutable access to an account held by an [`AccountBook`], minus renaming.
#[derive(Debug)]
pub struct AccountEdit<'a> {
    account: &'a mut Account,
}

impl AccountEdit<'_> {
    /// Set or clear the external reference.
    pub fn set_reference(&mut self, reference: Option<&str>) {
        self.account.set_reference(reference);
    }

    /// Set or clear the group.
    pub fn set_groupname(&mut self, groupname: Option<&str>) {
        self.account.set_groupname(groupname);
    }

    /// Set or clear the account number.
    pub fn set_account_number(&mut self, account_number: Option<&str>) {
        self.account.set_account_number(account_number);
    }

    /// Set or clear the notes.
    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.account.set_notes(notes);
    }

    /// Mark the account inactive.
    pub fn set_inactive(&mut self, inactive: bool) {
        self.account.set_inactive(inactive);
    }

    /// Flag the account as autocreated.
    pub fn set_autocreated(&mut self, autocreated: bool) {
        self.account.set_autocreated(autocreated);
    }

    /// Change the default currency.
    pub fn set_currency(&mut self, currency: CurrencyRef) {
        self.account.set_currency(currency);
    }
}

impl Deref for AccountEdit<'_> {
    type Target = Account;

    fn deref(&self) -> &Account {
        &*self.account
    }
}
