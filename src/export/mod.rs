mod csv;
mod format;
mod ledger;

use crate::accounts::ResolvedAccount;
use crate::error::ConvertError;
use crate::transaction::Transaction;

pub use self::csv::{CsvExporter, DEFAULT_CSV_FIELDS};
pub use format::{format_amount, format_category, DEFAULT_CATEGORY_SEPARATOR};
pub use ledger::LedgerExporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Ledger,
}

/// Renders resolved transactions to an output stream, one complete entry per call.
pub trait Exporter {
    fn write_entry(
        &mut self,
        xact: &Transaction,
        account: &ResolvedAccount,
    ) -> Result<(), ConvertError>;

    fn flush(&mut self) -> Result<(), ConvertError>;
}
