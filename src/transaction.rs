use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConvertError;

/// Shown instead of a currency code when Plaid reports neither an official nor an unofficial one
pub const UNKNOWN_CURRENCY: &str = "[UKN]";

/// A single transaction as reported by Plaid.
///
/// Only the fields the converter needs are typed. Everything else the provider sends
/// (`pending`, `merchant_name`, `payment_channel`, ...) is kept in `other_fields` so it can
/// be exported as a csv column or rewritten by a payee override.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub name: String,
    /// Positive amounts are money leaving the account.
    pub amount: Decimal,
    /// None for currencies without an ISO code, see `unofficial_currency_code` in `other_fields`.
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    pub category_id: String,
    pub category: Vec<String>,
    #[serde(flatten)]
    pub other_fields: Map<String, Value>,
}

impl Transaction {
    /// Parse the transaction at position `index` of an input list.
    pub fn from_json(index: usize, value: Value) -> Result<Self, ConvertError> {
        serde_json::from_value(value)
            .map_err(|source| ConvertError::InvalidTransaction { index, source })
    }

    /// Currency code to display: the ISO code, else Plaid's unofficial code (e.g. for crypto).
    pub fn currency_code(&self) -> &str {
        self.iso_currency_code
            .as_deref()
            .or_else(|| {
                self.other_fields
                    .get("unofficial_currency_code")
                    .and_then(Value::as_str)
            })
            .unwrap_or(UNKNOWN_CURRENCY)
    }

    /// Parse a whole transaction list, failing on the first malformed record.
    pub fn parse_list(values: Vec<Value>) -> Result<Vec<Self>, ConvertError> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Self::from_json(index, value))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub fn coffee_shop() -> Transaction {
        Transaction::from_json(
            0,
            json!({
                "transaction_id": "tx123",
                "account_id": "acc-checking",
                "date": "2024-01-05",
                "name": "Coffee Shop",
                "amount": 12.5,
                "iso_currency_code": "USD",
                "category_id": "13005000",
                "category": ["Food and Drink", "Restaurants", "Coffee Shop"],
                "pending": false,
                "merchant_name": null,
            }),
        )
        .unwrap()
    }

    #[test]
    fn parses_typed_and_other_fields() {
        let xact = coffee_shop();
        assert_eq!("tx123", xact.transaction_id);
        assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), xact.date);
        assert_eq!(Decimal::new(125, 1), xact.amount);
        assert_eq!(Some(&json!(false)), xact.other_fields.get("pending"));
        assert_eq!(Some(&Value::Null), xact.other_fields.get("merchant_name"));
        assert!(!xact.other_fields.contains_key("amount"));
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = Transaction::from_json(
            3,
            json!({
                "transaction_id": "tx1",
                "account_id": "acc",
                "date": "2024-01-05",
                "name": "Coffee Shop",
                "iso_currency_code": "USD",
                "category_id": "13005000",
                "category": [],
            }),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("#3"), "{message}");
        assert!(message.contains("amount"), "{message}");
    }

    #[test]
    fn currency_without_iso_code() {
        let mut value = serde_json::to_value(coffee_shop()).unwrap();
        value["iso_currency_code"] = Value::Null;
        value["unofficial_currency_code"] = json!("BTC");
        let xact = Transaction::parse_list(vec![value]).unwrap().remove(0);
        assert_eq!(None, xact.iso_currency_code);
        assert_eq!("BTC", xact.currency_code());

        let mut value = serde_json::to_value(coffee_shop()).unwrap();
        value["iso_currency_code"] = Value::Null;
        let xact = Transaction::from_json(0, value).unwrap();
        assert_eq!(UNKNOWN_CURRENCY, xact.currency_code());
        assert_eq!("USD", coffee_shop().currency_code());
    }

    #[test]
    fn parse_list_keeps_order() {
        let mut second = serde_json::to_value(coffee_shop()).unwrap();
        second["transaction_id"] = json!("tx456");
        let first = serde_json::to_value(coffee_shop()).unwrap();

        let parsed = Transaction::parse_list(vec![first, second]).unwrap();
        let ids: Vec<_> = parsed.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(vec!["tx123", "tx456"], ids);
    }

    #[test]
    fn reserializes_other_fields() {
        let value = serde_json::to_value(coffee_shop()).unwrap();
        assert_eq!(json!(false), value["pending"]);
        assert_eq!(json!("13005000"), value["category_id"]);
        assert_eq!(json!("2024-01-05"), value["date"]);
    }
}
