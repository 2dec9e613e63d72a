use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_LEDGER_ACCOUNT: &str = "Assets:Unknown";

/// How amounts are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountStyle {
    /// Flip the provider sign convention (positive = money leaving the account).
    pub negate: bool,
    /// Append the ISO currency code after the amount.
    pub show_currency: bool,
}

/// Per account settings from the accounts file. Every field is optional and falls back to
/// the run wide defaults on its own.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSettings {
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub ledger_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
    #[serde(rename = "currency", default, skip_serializing_if = "Option::is_none")]
    pub show_currency: Option<bool>,
}

impl AccountSettings {
    pub fn merge(&self, defaults: AmountStyle) -> ResolvedAccount {
        ResolvedAccount {
            ledger_account_name: self
                .ledger_account_name
                .clone()
                .unwrap_or_else(|| DEFAULT_LEDGER_ACCOUNT.to_string()),
            amount_style: AmountStyle {
                negate: self.negate.unwrap_or(defaults.negate),
                show_currency: self.show_currency.unwrap_or(defaults.show_currency),
            },
        }
    }
}

/// Fully populated account settings for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub ledger_account_name: String,
    pub amount_style: AmountStyle,
}

/// One account of the accounts file, `{bank: {account name: AccountEntry}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    pub account_id: String,
    #[serde(flatten)]
    pub settings: AccountSettings,
}

/// Accounts file content: bank name -> account name -> account.
pub type BankAccounts = HashMap<String, HashMap<String, AccountEntry>>;

/// Account settings keyed by Plaid account id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountConfigs {
    accounts: HashMap<String, AccountSettings>,
}

impl AccountConfigs {
    pub fn new(accounts: HashMap<String, AccountSettings>) -> Self {
        Self { accounts }
    }

    pub fn from_banks(banks: &BankAccounts) -> Self {
        Self {
            accounts: banks
                .values()
                .flat_map(|accounts| accounts.values())
                .map(|entry| (entry.account_id.clone(), entry.settings.clone()))
                .collect(),
        }
    }

    /// Settings for `account_id`, with anything it doesn't set taken from `defaults`.
    /// Unknown accounts get the defaults and [DEFAULT_LEDGER_ACCOUNT].
    pub fn resolve(&self, account_id: &str, defaults: AmountStyle) -> ResolvedAccount {
        match self.accounts.get(account_id) {
            Some(settings) => settings.merge(defaults),
            None => AccountSettings::default().merge(defaults),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
