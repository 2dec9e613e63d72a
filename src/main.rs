use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = plaid_ledger::args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();
    plaid_ledger::cli::main(args).await
}
