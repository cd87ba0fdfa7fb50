use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use crcx::core::log::init_logging;
use rust_decimal::Decimal;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Seconds to wait for the exchange rate service before giving up
    #[arg(short, long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CurrencyArg {
    Crc,
    Usd,
    Eur,
}

impl From<CurrencyArg> for crcx::Currency {
    fn from(arg: CurrencyArg) -> crcx::Currency {
        match arg {
            CurrencyArg::Crc => crcx::Currency::Crc,
            CurrencyArg::Usd => crcx::Currency::Usd,
            CurrencyArg::Eur => crcx::Currency::Eur,
        }
    }
}

impl From<Commands> for crcx::AppCommand {
    fn from(cmd: Commands) -> crcx::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => crcx::AppCommand::Convert {
                amount,
                from: from.into(),
                to: to.into(),
            },
            Commands::Rates => crcx::AppCommand::Rates,
            Commands::Summary { amount } => crcx::AppCommand::Summary { amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(value_enum, ignore_case = true)]
        from: CurrencyArg,
        #[arg(value_enum, ignore_case = true)]
        to: CurrencyArg,
    },
    /// Display the published dollar and euro rates
    Rates,
    /// Convert an amount through every currency pair
    Summary {
        #[arg(default_value = "1000")]
        amount: Decimal,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => crcx::cli::setup::setup(),
        Some(cmd) => {
            crcx::run_command(
                cmd.into(),
                cli.config_path.as_deref(),
                Duration::from_secs(cli.timeout),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
