pub mod cli;
pub mod converter;
pub mod core;
pub mod providers;

pub use crate::converter::ExchangeRateConverter;
pub use crate::core::{
    CancelHandle, CancelSignal, Conversion, Currency, DollarRate, EuroRate, RateError,
    RateSnapshot, RateSource,
};

use anyhow::Result;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: Decimal,
        from: Currency,
        to: Currency,
    },
    Rates,
    Summary {
        amount: Decimal,
    },
}

/// Runs a command against the configured indicator API. The whole command is
/// cancelled once `timeout` elapses.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    timeout: Duration,
) -> Result<()> {
    info!("crcx starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::HaciendaProvider::new(&config.provider)?;
    let converter = ExchangeRateConverter::new(provider, config.cache_duration());

    let cancel = CancelHandle::new();
    let signal = cancel.signal();
    let timer = tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        debug!("Timed out after {:?}, cancelling", timeout);
        cancel.cancel();
    });

    let result = match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&converter, amount, from, to, &signal).await
        }
        AppCommand::Rates => cli::rates::run(&converter, &signal).await,
        AppCommand::Summary { amount } => cli::summary::run(&converter, amount, &signal).await,
    };

    timer.abort();
    result
}
