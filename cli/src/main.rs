//! Tallybook CLI
//!
//! Inspect currencies, amounts, conversions and account sign conventions.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::RateSpec;
use config::CliConfig;
use tallybook_common::FormatOptions;

/// Tallybook CLI
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Tallybook currency and account tools")]
struct Args {
    /// Exchange rate to load, as CODE:YYYY-MM-DD:RATE (repeatable)
    #[arg(long = "rate", global = true)]
    rates: Vec<RateSpec>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an amount
    Format {
        /// Amount, e.g. "1234.5 EUR"
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Prefix the currency symbol
        #[arg(long)]
        symbol: bool,

        /// Fixed number of decimal places
        #[arg(long)]
        places: Option<u32>,

        /// Group thousands
        #[arg(long)]
        grouping: bool,
    },

    /// Show the canonical form of an amount
    Parse {
        /// Amount, e.g. "12.34 EUR"
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Convert an amount into another currency
    Convert {
        /// Amount, e.g. "100 EUR"
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Target currency code
        #[arg(short, long)]
        to: String,

        /// Date of the rates to use (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show an amount as an account of the given type displays it
    Normalize {
        /// Raw ledger amount, e.g. "-50 USD"
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Account type: asset, liability, income or expense
        #[arg(short = 't', long = "type")]
        account_type: String,
    },

    /// List registered currencies
    Currencies,
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let args = Args::parse();
    info!(command = ?args.command, "Starting tally");

    let currencies = commands::build_registry(&config, &args.rates)?;

    let output = match &args.command {
        Command::Format {
            amount,
            symbol,
            places,
            grouping,
        } => {
            let mut options = FormatOptions::default();
            if *symbol {
                options = options.with_symbol();
            }
            if let Some(places) = places {
                options = options.with_places(*places);
            }
            if *grouping {
                options = options.with_grouping();
            }
            commands::format(&currencies, &config, amount, options)?
        }
        Command::Parse { amount } => commands::parse(&currencies, &config, amount)?,
        Command::Convert { amount, to, date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            commands::convert(&currencies, &config, amount, to, date)?
        }
        Command::Normalize {
            amount,
            account_type,
        } => commands::normalize(&currencies, &config, amount, account_type)?,
        Command::Currencies => commands::currencies(&currencies)?,
    };

    println!("{}", output.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_args() {
        let args = Args::try_parse_from([
            "tally",
            "convert",
            "-12.50 EUR",
            "--to",
            "JPY",
            "--rate",
            "EUR:2024-01-01:1.08",
            "--rate",
            "JPY:2024-01-01:0.0067",
        ])
        .unwrap();

        assert_eq!(args.rates.len(), 2);
        match args.command {
            Command::Convert { amount, to, date } => {
                assert_eq!(amount, "-12.50 EUR");
                assert_eq!(to, "JPY");
                assert!(date.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
