//! budget-client - command line entry point
//!
//! Runs one API operation per invocation and prints the result as JSON.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use budget_client::money::decimal_to_minor_units;
use budget_client::{config::Config, BudgetClient, Transaction};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "budget-client",
    version,
    about = "Query and update a budget through the Actual Budget HTTP API",
    long_about = "Connection settings are read from BUDGET_API_HOST, BUDGET_API_KEY, \
                  BUDGET_SYNC_ID and the optional BUDGET_API_TIMEOUT_SECS."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accounts
    Accounts {
        /// Only accounts that are not closed
        #[arg(long)]
        open: bool,
    },
    /// Show an account balance
    Balance {
        /// Account ID
        account: String,
    },
    /// List payees
    Payees,
    /// Find a payee by exact name, creating it if missing
    EnsurePayee {
        name: String,
    },
    /// List an account's transactions
    #[command(alias = "txn")]
    Transactions {
        /// Account ID
        account: String,
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        since: NaiveDate,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Import transactions from a JSON file
    Import {
        /// Account ID
        account: String,
        /// JSON array of transactions, or an object with a `transactions` array
        file: std::path::PathBuf,
        /// Amounts in the file are currency units (e.g. `12.34`) rather than cents
        #[arg(long)]
        decimal_amounts: bool,
    },
    /// Trigger bank sync for all linked accounts
    BankSync,
}

fn read_transactions(path: &Path, decimal_amounts: bool) -> anyhow::Result<Vec<Transaction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;

    let mut entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(entries)) => entries,
            _ => anyhow::bail!("{} has no `transactions` array", path.display()),
        },
        _ => anyhow::bail!("{} is not a transaction list", path.display()),
    };

    if decimal_amounts {
        for (index, entry) in entries.iter_mut().enumerate() {
            if let Some(amount) = entry.get_mut("amount") {
                let cents = amount_to_minor_units(amount)
                    .with_context(|| format!("Transaction {} has an invalid amount", index))?;
                *amount = Value::from(cents);
            }
        }
    }

    serde_json::from_value(Value::Array(entries))
        .with_context(|| format!("Failed to parse transactions in {}", path.display()))
}

/// Convert a JSON number or numeric string in currency units to cents.
fn amount_to_minor_units(amount: &Value) -> anyhow::Result<i64> {
    let text = match amount {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => anyhow::bail!("expected a number, got {}", other),
    };
    let decimal = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .with_context(|| format!("{:?} is not a decimal amount", text))?;
    decimal_to_minor_units(decimal).with_context(|| format!("{} is out of range", decimal))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_raw(body: &str) -> anyhow::Result<()> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => print_json(&value),
        Err(_) => {
            println!("{}", body);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budget_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = BudgetClient::from_config(&config)?;
    tracing::debug!(host = client.host(), budget = client.budget_sync_id(), "Client ready");

    match cli.command {
        Commands::Accounts { open } => {
            let accounts = if open {
                client.list_open_accounts().await?
            } else {
                client.list_accounts().await?
            };
            print_json(&accounts)?;
        }
        Commands::Balance { account } => {
            let balance = client.get_account_balance(&account).await?;
            println!("{}", balance);
        }
        Commands::Payees => print_json(&client.list_payees().await?)?,
        Commands::EnsurePayee { name } => print_json(&client.ensure_payee_exists(&name).await?)?,
        Commands::Transactions {
            account,
            since,
            until,
        } => {
            let transactions = client.list_transactions(&account, since, until).await?;
            print_json(&transactions)?;
        }
        Commands::Import {
            account,
            file,
            decimal_amounts,
        } => {
            let transactions = read_transactions(&file, decimal_amounts)?;
            tracing::info!(count = transactions.len(), account = %account, "Importing transactions");
            let response = client.import_transactions(&account, &transactions).await?;
            print_raw(&response.body)?;
        }
        Commands::BankSync => {
            let response = client.trigger_all_bank_syncs().await?;
            print_raw(&response.body)?;
        }
    }

    Ok(())
}
