//! Rate formulas for the six conversion directions.

use super::rate::{Currency, RateSnapshot};
use rust_decimal::Decimal;
use std::fmt;

/// A conversion direction between two of the quoted currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    ColonesToDollars,
    DollarsToColones,
    ColonesToEuros,
    EurosToColones,
    DollarsToEuros,
    EurosToDollars,
}

impl Conversion {
    pub const ALL: [Conversion; 6] = [
        Conversion::DollarsToColones,
        Conversion::ColonesToDollars,
        Conversion::DollarsToEuros,
        Conversion::EurosToDollars,
        Conversion::ColonesToEuros,
        Conversion::EurosToColones,
    ];

    /// Returns the conversion from `from` to `to`, or `None` when both are the
    /// same currency.
    pub fn between(from: Currency, to: Currency) -> Option<Self> {
        match (from, to) {
            (Currency::Crc, Currency::Usd) => Some(Conversion::ColonesToDollars),
            (Currency::Usd, Currency::Crc) => Some(Conversion::DollarsToColones),
            (Currency::Crc, Currency::Eur) => Some(Conversion::ColonesToEuros),
            (Currency::Eur, Currency::Crc) => Some(Conversion::EurosToColones),
            (Currency::Usd, Currency::Eur) => Some(Conversion::DollarsToEuros),
            (Currency::Eur, Currency::Usd) => Some(Conversion::EurosToDollars),
            _ => None,
        }
    }

    pub fn source(self) -> Currency {
        match self {
            Conversion::ColonesToDollars | Conversion::ColonesToEuros => Currency::Crc,
            Conversion::DollarsToColones | Conversion::DollarsToEuros => Currency::Usd,
            Conversion::EurosToColones | Conversion::EurosToDollars => Currency::Eur,
        }
    }

    pub fn target(self) -> Currency {
        match self {
            Conversion::DollarsToColones | Conversion::EurosToColones => Currency::Crc,
            Conversion::ColonesToDollars | Conversion::EurosToDollars => Currency::Usd,
            Conversion::ColonesToEuros | Conversion::DollarsToEuros => Currency::Eur,
        }
    }

    /// Derives the multiplier for this direction from a snapshot.
    ///
    /// Missing rates count as zero and any division by zero yields zero, so
    /// partial upstream data degrades to a zero result instead of an error.
    pub fn rate(self, snapshot: &RateSnapshot) -> Decimal {
        match self {
            Conversion::DollarsToColones => snapshot.sale(),
            Conversion::ColonesToDollars => safe_divide(Decimal::ONE, snapshot.purchase()),
            Conversion::EurosToDollars => snapshot.euro_dollars(),
            Conversion::DollarsToEuros => safe_divide(Decimal::ONE, snapshot.euro_dollars()),
            Conversion::EurosToColones => match snapshot.euro_in_colones {
                Some(colones) => colones,
                // Cross rate through the dollar while colones are unpublished.
                None => multiply(snapshot.sale(), snapshot.euro_raw()),
            },
            Conversion::ColonesToEuros => match snapshot.euro_in_colones {
                Some(colones) if !colones.is_zero() => safe_divide(Decimal::ONE, colones),
                _ => safe_divide(
                    Decimal::ONE,
                    multiply(snapshot.purchase(), snapshot.euro_raw()),
                ),
            },
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source(), self.target())
    }
}

/// Divides, returning zero for a zero denominator or an overflow.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

fn multiply(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}
