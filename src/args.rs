use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_DIR;
use crate::export::{OutputFormat, DEFAULT_CATEGORY_SEPARATOR};

/// Download transactions from Plaid and convert them to csv or ledger format.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// File to write the output to. Defaults to stdout.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Directory holding credentials.json, accounts.json and the override files
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the transaction history of a bank connection as json
    Fetch(FetchArgs),

    /// Convert a saved transaction history to csv or ledger format
    Convert(ConvertArgs),

    /// Print the accounts of a bank connection
    List {
        /// Name of the bank connection in credentials.json
        bank: String,
    },

    /// Print Plaid's category list, downloading and caching it if needed
    Categories {
        /// Download the list again even if it is cached
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Name of the bank connection in credentials.json
    pub bank: String,

    /// First day to fetch, YYYY-MM-DD. Defaults to two years before --end.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to fetch, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Only fetch this account (its name in accounts.json)
    #[arg(long, conflicts_with = "all")]
    pub account: Option<String>,

    /// Fetch every account of the connection, not just the ones in accounts.json
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, clap::Args)]
pub struct ConvertArgs {
    /// Transaction history as written by `fetch`
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub format: OutputFormat,

    /// Append the currency code to amounts
    #[arg(short, long)]
    pub currency: bool,

    /// Flip the sign of amounts
    #[arg(short, long)]
    pub negate: bool,

    /// Comma separated list of csv columns
    #[arg(long, value_delimiter = ',', default_values = ["date", "amount", "name"])]
    pub fields: Vec<String>,

    /// Separator between the levels of a category
    #[arg(long, default_value = DEFAULT_CATEGORY_SEPARATOR)]
    pub category_separator: String,
}

pub fn parse() -> Args {
    Args::parse()
}
