use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Unknown categories and unknown accounts are not errors, they silently fall back to the
/// provider breadcrumb and the global defaults.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An input record is missing a required field or has one of the wrong type.
    #[error("Transaction #{index} of the input is malformed: {source}")]
    InvalidTransaction {
        index: usize,
        source: serde_json::Error,
    },

    /// Applying a payee override left the record in a state that isn't a valid transaction.
    #[error("Payee override for '{payee}' produced an invalid transaction: {source}")]
    InvalidPayeeOverride {
        payee: String,
        source: serde_json::Error,
    },

    /// A csv column names a field the transaction doesn't have.
    #[error("Transaction {transaction_id} has no field '{field}'")]
    MissingField {
        transaction_id: String,
        field: String,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to encode csv row: {0}")]
    Csv(#[from] csv::Error),
}
