use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::plaid_api::AccessToken;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    Sandbox,
    Development,
    #[default]
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.plaid.com",
            Self::Development => "https://development.plaid.com",
            Self::Production => "https://production.plaid.com",
        }
    }
}

/// Content of `credentials.json`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub secret: String,
    #[serde(default)]
    pub environment: PlaidEnvironment,
    /// Access token per bank connection, keyed by the name the user gave the bank.
    #[serde(default)]
    pub banks: HashMap<String, AccessToken>,
}

impl Credentials {
    pub fn access_token(&self, bank: &str) -> Result<&AccessToken> {
        self.banks
            .get(bank)
            .ok_or_else(|| anyhow!("No access token for bank '{bank}' in credentials"))
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret", &"[redacted]")
            .field("environment", &self.environment)
            .field("banks", &self.banks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credentials() -> Credentials {
        serde_json::from_value(json!({
            "client_id": "client-id",
            "secret": "very-secret",
            "public_key": "ignored",
            "banks": {"chase": "access-sandbox-123"},
        }))
        .unwrap()
    }

    #[test]
    fn parse() {
        let credentials = credentials();
        assert_eq!(PlaidEnvironment::Production, credentials.environment);
        assert_eq!(
            "access-sandbox-123",
            credentials.access_token("chase").unwrap().get()
        );
        assert!(credentials.access_token("ally").is_err());
    }

    #[test]
    fn debug_hides_secrets() {
        let debug = format!("{:?}", credentials());
        assert!(!debug.contains("very-secret"), "{debug}");
        assert!(!debug.contains("access-sandbox-123"), "{debug}");
        assert!(debug.contains("chase"), "{debug}");
    }
}
