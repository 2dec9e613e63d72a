pub mod accounts;
pub mod args;
pub mod category;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod overrides;
pub mod plaid_api;
pub mod transaction;

pub use category::resolve_category;
pub use convert::{convert, ConvertConfig, LookupTables};
pub use error::ConvertError;
pub use transaction::Transaction;
