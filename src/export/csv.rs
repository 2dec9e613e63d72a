use serde_json::Value;
use std::io::Write;

use super::{format_amount, format_category, Exporter};
use crate::accounts::{AmountStyle, ResolvedAccount};
use crate::error::ConvertError;
use crate::transaction::Transaction;

pub const DEFAULT_CSV_FIELDS: &[&str] = &["date", "amount", "name"];

/// Writes one header-less csv row per transaction.
///
/// Amounts use the run wide [AmountStyle], per account settings only apply to ledger output.
pub struct CsvExporter<W: Write> {
    output: W,
    fields: Vec<String>,
    amount_style: AmountStyle,
    category_separator: String,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(
        output: W,
        fields: Vec<String>,
        amount_style: AmountStyle,
        category_separator: String,
    ) -> Self {
        Self {
            output,
            fields,
            amount_style,
            category_separator,
        }
    }

    fn cell(&self, xact: &Transaction, field: &str) -> Result<String, ConvertError> {
        let cell = match field {
            "amount" => format_amount(xact.amount, xact.currency_code(), self.amount_style),
            "category" => format_category(&xact.category, &self.category_separator),
            "transaction_id" => xact.transaction_id.clone(),
            "account_id" => xact.account_id.clone(),
            "date" => xact.date.to_string(),
            "name" => xact.name.clone(),
            "iso_currency_code" => xact.iso_currency_code.clone().unwrap_or_default(),
            "category_id" => xact.category_id.clone(),
            other => xact
                .other_fields
                .get(other)
                .map(value_to_cell)
                .ok_or_else(|| ConvertError::MissingField {
                    transaction_id: xact.transaction_id.clone(),
                    field: other.to_string(),
                })?,
        };
        Ok(cell)
    }
}

impl<W: Write> Exporter for CsvExporter<W> {
    fn write_entry(
        &mut self,
        xact: &Transaction,
        _account: &ResolvedAccount,
    ) -> Result<(), ConvertError> {
        let row = self
            .fields
            .iter()
            .map(|field| self.cell(xact, field))
            .collect::<Result<Vec<_>, _>>()?;

        // Encode into a buffer first so a failing write never leaves half a row behind
        let mut encoder = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        encoder.write_record(&row)?;
        let encoded = encoder
            .into_inner()
            .map_err(|err| ConvertError::Write(err.into_error()))?;
        self.output.write_all(&encoded)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConvertError> {
        self.output.flush()?;
        Ok(())
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
