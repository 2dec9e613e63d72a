use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

mod credentials;
mod file;

pub use credentials::{Credentials, PlaidEnvironment};
pub use file::{load_json, save_json};

use crate::accounts::{AccountConfigs, BankAccounts};
use crate::category::{HierarchyTable, Taxonomy};
use crate::convert::LookupTables;
use crate::overrides::PayeeOverrides;

pub const DEFAULT_CONFIG_DIR: &str = ".plaid-ledger";

const CREDENTIALS_FILE: &str = "credentials.json";
const ACCOUNTS_FILE: &str = "accounts.json";
const PAYEES_FILE: &str = "payees.json";
const CATEGORIES_FILE: &str = "categories.json";
const HIERARCHIES_FILE: &str = ".plaid-hierarchies.json";

/// The directory holding credentials, account settings and override tables.
#[derive(Debug, Clone)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn credentials(&self) -> Result<Credentials> {
        let path = self.path.join(CREDENTIALS_FILE);
        load_json(&path)
            .await?
            .ok_or_else(|| anyhow!("Credentials file {} not found", path.display()))
    }

    /// Accounts per bank. A missing file means no accounts are configured.
    pub async fn bank_accounts(&self) -> Result<BankAccounts> {
        Ok(load_json(&self.path.join(ACCOUNTS_FILE))
            .await?
            .unwrap_or_default())
    }

    pub async fn payees(&self) -> Result<Option<PayeeOverrides>> {
        load_json(&self.path.join(PAYEES_FILE)).await
    }

    /// The user's category taxonomy.
    pub async fn taxonomy(&self) -> Result<Option<Taxonomy>> {
        load_json(&self.path.join(CATEGORIES_FILE)).await
    }

    /// The cached provider categories.
    pub async fn hierarchies(&self) -> Result<Option<HierarchyTable>> {
        load_json(&self.path.join(HIERARCHIES_FILE)).await
    }

    pub async fn save_hierarchies(&self, hierarchies: &HierarchyTable) -> Result<()> {
        save_json(hierarchies, &self.path.join(HIERARCHIES_FILE)).await
    }

    /// Load every table a conversion run reads.
    pub async fn lookup_tables(&self) -> Result<LookupTables> {
        log::info!("Loading config from {}...", self.path.display());
        let tables = LookupTables {
            accounts: AccountConfigs::from_banks(&self.bank_accounts().await?),
            payees: self.payees().await?,
            hierarchies: self.hierarchies().await?,
            taxonomy: self.taxonomy().await?,
        };
        log::info!(
            "Loading config from {}...done ({} accounts, {} payees, {} cached categories, taxonomy {})",
            self.path.display(),
            tables.accounts.len(),
            tables.payees.as_ref().map_or(0, PayeeOverrides::len),
            tables.hierarchies.as_ref().map_or(0, HierarchyTable::len),
            if tables.taxonomy.is_some() { "present" } else { "absent" },
        );
        Ok(tables)
    }
}
