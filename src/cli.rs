use anyhow::{anyhow, Context as _, Result};
use chrono::{Days, NaiveDate};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::accounts::{AmountStyle, BankAccounts};
use crate::args::{Args, Command, ConvertArgs, FetchArgs};
use crate::category::{resolve_category, HierarchyTable, Taxonomy};
use crate::config::ConfigDir;
use crate::convert::{convert, ConvertConfig};
use crate::export::{format_category, DEFAULT_CATEGORY_SEPARATOR};
use crate::plaid_api::{self, Plaid, TransactionsQuery};
use crate::transaction::Transaction;

/// Plaid serves at most two years of history
const DEFAULT_HISTORY_DAYS: u64 = 730;

pub async fn main(args: Args) -> Result<()> {
    let config = ConfigDir::new(&args.config_dir);
    let output = args.output.as_deref();
    match args.command {
        Command::Fetch(fetch) => main_fetch(&config, fetch, output).await,
        Command::Convert(convert) => main_convert(&config, convert, output).await,
        Command::List { bank } => main_list(&config, &bank, output).await,
        Command::Categories { refresh } => main_categories(&config, refresh, output).await,
    }
}

/// Only call this once all inputs are loaded, creating the file truncates it.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    })
}

async fn main_fetch(config: &ConfigDir, args: FetchArgs, output: Option<&Path>) -> Result<()> {
    let credentials = config.credentials().await?;
    let bank_accounts = config.bank_accounts().await?;
    let access_token = credentials.access_token(&args.bank)?;

    let end_date = args
        .end
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start_date = args.start.unwrap_or_else(|| {
        end_date
            .checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS))
            .unwrap_or(NaiveDate::MIN)
    });
    let query = TransactionsQuery {
        start_date,
        end_date,
        account_ids: account_filter(&bank_accounts, &args)?,
    };
    log::info!(
        "Fetching transactions of bank '{}' from {start_date} to {end_date}...",
        args.bank
    );

    let client = Plaid::new(&credentials);
    let transactions = plaid_api::get_transactions(&client, access_token, &query).await?;

    write_json(&mut open_output(output)?, &transactions)?;
    log::info!("Wrote {} transactions", transactions.len());
    Ok(())
}

/// Account ids to restrict a fetch to. None means all accounts of the connection.
fn account_filter(bank_accounts: &BankAccounts, args: &FetchArgs) -> Result<Option<Vec<String>>> {
    if args.all {
        return Ok(None);
    }
    let accounts = bank_accounts.get(&args.bank);
    if let Some(name) = &args.account {
        let entry = accounts
            .and_then(|accounts| accounts.get(name))
            .ok_or_else(|| {
                anyhow!(
                    "Account '{name}' of bank '{}' not found in accounts.json",
                    args.bank
                )
            })?;
        return Ok(Some(vec![entry.account_id.clone()]));
    }

    let mut account_ids: Vec<String> = accounts
        .into_iter()
        .flat_map(|accounts| accounts.values())
        .map(|entry| entry.account_id.clone())
        .collect();
    if account_ids.is_empty() {
        Ok(None)
    } else {
        account_ids.sort();
        Ok(Some(account_ids))
    }
}

async fn main_convert(config: &ConfigDir, args: ConvertArgs, output: Option<&Path>) -> Result<()> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let values: Vec<Value> = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    let transactions = Transaction::parse_list(values)?;

    let tables = config.lookup_tables().await?;
    if tables.hierarchies.is_none() {
        log::info!(
            "No cached Plaid categories in {}, run the categories command to download them",
            config.path().display()
        );
    }

    let convert_config = ConvertConfig {
        format: args.format,
        fields: args.fields,
        amount_style: AmountStyle {
            negate: args.negate,
            show_currency: args.currency,
        },
        category_separator: args.category_separator,
    };
    let num_entries = convert(transactions, &convert_config, &tables, open_output(output)?)?;
    log::info!("Converted {num_entries} transactions");
    Ok(())
}

async fn main_list(config: &ConfigDir, bank: &str, output: Option<&Path>) -> Result<()> {
    let credentials = config.credentials().await?;
    let client = Plaid::new(&credentials);
    let auth = plaid_api::get_auth(&client, credentials.access_token(bank)?).await?;
    write_json(&mut open_output(output)?, &auth)
}

async fn main_categories(config: &ConfigDir, refresh: bool, output: Option<&Path>) -> Result<()> {
    let hierarchies = match config.hierarchies().await? {
        Some(hierarchies) if !refresh => hierarchies,
        _ => {
            let credentials = config.credentials().await?;
            let hierarchies = plaid_api::get_categories(&Plaid::new(&credentials)).await?;
            config.save_hierarchies(&hierarchies).await?;
            hierarchies
        }
    };
    let taxonomy = config.taxonomy().await?;
    write_categories(&hierarchies, taxonomy.as_ref(), open_output(output)?)
}

fn write_categories(
    hierarchies: &HierarchyTable,
    taxonomy: Option<&Taxonomy>,
    mut output: impl Write,
) -> Result<()> {
    for (category_id, category) in hierarchies.iter_sorted() {
        let provider_path = format_category(&category.hierarchy, DEFAULT_CATEGORY_SEPARATOR);
        match taxonomy {
            Some(taxonomy) => {
                let resolved = resolve_category(category_id, &category.hierarchy, taxonomy);
                writeln!(
                    output,
                    "{category_id}  {provider_path}  ->  {}",
                    format_category(&resolved, DEFAULT_CATEGORY_SEPARATOR)
                )?;
            }
            None => writeln!(output, "{category_id}  {provider_path}")?,
        }
    }
    output.flush()?;
    Ok(())
}

fn write_json(output: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
