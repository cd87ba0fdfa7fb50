//! Exchange rate snapshot and the raw rates published with it.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Currencies quoted by the indicator API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Costa Rican colón, the local currency.
    Crc,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Crc => "CRC",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Crc => "₡",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One fetched exchange-rate document. Never modified after it is built.
///
/// Every field is optional because the publisher omits values freely. In
/// particular `euro_in_colones` is only published during business hours, and
/// its absence is meaningful to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateSnapshot {
    /// Colones per dollar, sale side.
    pub dollar_sale: Option<Decimal>,
    /// Colones per dollar, purchase side.
    pub dollar_purchase: Option<Decimal>,
    pub dollar_date: Option<String>,
    pub dollar_purchase_date: Option<String>,
    pub euro_date: Option<String>,
    /// Dollars per euro.
    pub euro_in_dollars: Option<Decimal>,
    /// Colones per euro.
    pub euro_in_colones: Option<Decimal>,
    /// Textual dollars-per-euro rate, used when `euro_in_dollars` is missing.
    pub euro_raw_value: Option<String>,
}

impl RateSnapshot {
    pub fn sale(&self) -> Decimal {
        self.dollar_sale.unwrap_or_default()
    }

    pub fn purchase(&self) -> Decimal {
        self.dollar_purchase.unwrap_or_default()
    }

    /// The raw euro value parsed as a decimal, zero when missing or malformed.
    pub fn euro_raw(&self) -> Decimal {
        parse_invariant(self.euro_raw_value.as_deref())
    }

    /// Dollars per euro, falling back to the raw value.
    pub fn euro_dollars(&self) -> Decimal {
        self.euro_in_dollars.unwrap_or_else(|| self.euro_raw())
    }

    pub fn dollar_rate(&self) -> DollarRate {
        DollarRate {
            date: self.dollar_date.clone(),
            purchase_date: self.dollar_purchase_date.clone(),
            sale: self.sale(),
            purchase: self.purchase(),
        }
    }

    pub fn euro_rate(&self) -> EuroRate {
        EuroRate {
            date: self.euro_date.clone(),
            dollars: self.euro_dollars(),
            colones: self.euro_in_colones,
        }
    }
}

/// Published dollar rates. `date` belongs to the sale rate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DollarRate {
    pub date: Option<String>,
    pub purchase_date: Option<String>,
    pub sale: Decimal,
    pub purchase: Decimal,
}

/// Published euro rates. `colones` is `None` outside business hours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EuroRate {
    pub date: Option<String>,
    pub dollars: Decimal,
    pub colones: Option<Decimal>,
}

/// Parses a decimal the same way regardless of the host locale: `.` is the
/// decimal point and `,` is a group separator. Missing or malformed input is
/// zero.
pub fn parse_invariant(value: Option<&str>) -> Decimal {
    let Some(raw) = value else {
        return Decimal::ZERO;
    };
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}
