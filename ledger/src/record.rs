//! Serializable form of an account.

use serde::{Deserialize, Serialize};

use tallybook_fx::CurrencyRegistry;

use crate::account::{Account, AccountType};
use crate::error::LedgerResult;

/// Flat account record for persistence. The currency is stored by code and
/// resolved against a registry when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub autocreated: bool,
}

impl Account {
    /// Flatten into a persistable record.
    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            name: self.name().to_string(),
            account_type: self.account_type(),
            currency: self.currency().code().to_string(),
            reference: self.reference().map(ToString::to_string),
            groupname: self.groupname().map(ToString::to_string),
            account_number: self.account_number().map(ToString::to_string),
            notes: self.notes().map(ToString::to_string),
            inactive: self.is_inactive(),
            autocreated: self.is_autocreated(),
        }
    }

    /// Rebuild an account, resolving its currency through `registry`.
    pub fn from_record(record: &AccountRecord, registry: &CurrencyRegistry) -> LedgerResult<Account> {
        let currency = registry.lookup(&record.currency)?;
        let mut account = Account::new(&record.name, currency, record.account_type)?;
        account.set_reference(record.reference.as_deref());
        account.set_groupname(record.groupname.as_deref());
        account.set_account_number(record.account_number.as_deref());
        account.set_notes(record.notes.as_deref());
        account.set_inactive(record.inactive);
        account.set_autocreated(record.autocreated);
        Ok(account)
    }
}
