//! Tallybook Ledger Accounts
//!
//! Account classification, debit/credit sign normalization and the
//! document-level account book that keeps names unique.

pub mod account;
pub mod book;
pub mod collation;
pub mod error;
pub mod record;

pub use account::{Account, AccountType, NormalBalance};
pub use book::{AccountBook, AccountEdit, DEFAULT_ACCOUNT_NAME};
pub use collation::collation_key;
pub use error::{LedgerError, LedgerResult};
pub use record::AccountRecord;
