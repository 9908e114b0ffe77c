//! Tallybook Common Types
//!
//! Currency definitions, exact monetary amounts and the error type shared by
//! every Tallybook crate.

pub mod currency;
pub mod error;
pub mod monetary;

pub use currency::*;
pub use error::*;
pub use monetary::*;
