//! Errors raised while fetching rates or converting amounts.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while talking to the indicator API or converting.
#[derive(Debug, Error)]
pub enum RateError {
    /// Non-2xx response or a transport failure.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The response body was not valid JSON for the indicator document.
    #[error("Failed to parse exchange rate response: {0}")]
    Parse(String),

    /// The cancellation signal fired before the operation completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// The converted amount does not fit in a decimal.
    #[error("Conversion of {amount} overflowed")]
    Overflow { amount: Decimal },
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
