use std::io::Write;

use super::{format_amount, format_category, Exporter};
use crate::accounts::ResolvedAccount;
use crate::error::ConvertError;
use crate::transaction::Transaction;

const INDENT: &str = "    ";
const CATEGORY_AMOUNT_GAP: &str = "          ";

/// Writes one ledger journal entry per transaction:
///
/// ```text
/// 2024-01-05 * Coffee Shop
///     ; xactid: tx123
///     Food and Drink          5.00
///     Assets:Checking
///
/// ```
pub struct LedgerExporter<W: Write> {
    output: W,
    category_separator: String,
}

impl<W: Write> LedgerExporter<W> {
    pub fn new(output: W, category_separator: String) -> Self {
        Self {
            output,
            category_separator,
        }
    }

    fn render(&self, xact: &Transaction, account: &ResolvedAccount) -> String {
        let category = format_category(&xact.category, &self.category_separator);
        let amount = format_amount(xact.amount, xact.currency_code(), account.amount_style);
        format!(
            "{date} * {name}\n\
             {INDENT}; xactid: {id}\n\
             {INDENT}{category}{CATEGORY_AMOUNT_GAP}{amount}\n\
             {INDENT}{account}\n\
             \n",
            date = xact.date,
            name = xact.name,
            id = xact.transaction_id,
            account = account.ledger_account_name,
        )
    }
}

impl<W: Write> Exporter for LedgerExporter<W> {
    fn write_entry(
        &mut self,
        xact: &Transaction,
        account: &ResolvedAccount,
    ) -> Result<(), ConvertError> {
        let entry = self.render(xact, account);
        self.output.write_all(entry.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConvertError> {
        self.output.flush()?;
        Ok(())
    }
}
