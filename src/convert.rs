use std::io::Write;

use crate::accounts::{AccountConfigs, AmountStyle};
use crate::category::{HierarchyTable, Taxonomy};
use crate::error::ConvertError;
use crate::export::{
    CsvExporter, Exporter, LedgerExporter, OutputFormat, DEFAULT_CATEGORY_SEPARATOR,
    DEFAULT_CSV_FIELDS,
};
use crate::overrides::{apply_overrides, PayeeOverrides};
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub format: OutputFormat,
    /// Csv columns, ignored for ledger output.
    pub fields: Vec<String>,
    /// Run wide amount style. Accounts without their own settings fall back to it.
    pub amount_style: AmountStyle,
    pub category_separator: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            fields: DEFAULT_CSV_FIELDS.iter().map(|f| f.to_string()).collect(),
            amount_style: AmountStyle::default(),
            category_separator: DEFAULT_CATEGORY_SEPARATOR.to_string(),
        }
    }
}

/// Read-only lookup tables for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub accounts: AccountConfigs,
    pub payees: Option<PayeeOverrides>,
    /// Provider category paths, keyed by exact category code.
    pub hierarchies: Option<HierarchyTable>,
    /// User taxonomy, applied after `hierarchies`.
    pub taxonomy: Option<Taxonomy>,
}

/// Convert `transactions` in order and stream the rendered entries to `output`.
///
/// Every entry is written with a single write after it is fully rendered, so when this
/// fails the output holds the complete entries of all transactions before the failing one.
/// Returns the number of entries written.
pub fn convert<W: Write>(
    transactions: impl IntoIterator<Item = Transaction>,
    config: &ConvertConfig,
    tables: &LookupTables,
    output: W,
) -> Result<usize, ConvertError> {
    match config.format {
        OutputFormat::Csv => run(
            transactions,
            config.amount_style,
            tables,
            CsvExporter::new(
                output,
                config.fields.clone(),
                config.amount_style,
                config.category_separator.clone(),
            ),
        ),
        OutputFormat::Ledger => run(
            transactions,
            config.amount_style,
            tables,
            LedgerExporter::new(output, config.category_separator.clone()),
        ),
    }
}

fn run(
    transactions: impl IntoIterator<Item = Transaction>,
    defaults: AmountStyle,
    tables: &LookupTables,
    mut exporter: impl Exporter,
) -> Result<usize, ConvertError> {
    let mut num_entries = 0;
    for xact in transactions {
        let account = tables.accounts.resolve(&xact.account_id, defaults);
        let provider_category = xact.category.clone();
        let xact = apply_overrides(
            xact,
            tables.payees.as_ref(),
            tables.hierarchies.as_ref(),
            tables.taxonomy.as_ref(),
        )?;
        if xact.category == provider_category {
            log::debug!(
                "Transaction {}: kept provider category {:?} for code {}",
                xact.transaction_id,
                xact.category,
                xact.category_id,
            );
        }
        exporter.write_entry(&xact, &account)?;
        num_entries += 1;
    }
    exporter.flush()?;
    Ok(num_entries)
}
