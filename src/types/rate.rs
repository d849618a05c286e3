use crate::types::errors::RateError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// USD paid out per Robux through the Developer Exchange.
///
/// Always strictly positive. A rate is snapshotted onto every transaction when it is
/// ingested and is never looked up again afterwards.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DevexRate(Decimal);

impl DevexRate {
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value <= Decimal::ZERO {
            return Err(RateError::NonPositive(value));
        }

        Ok(DevexRate(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts an amount of Robux into USD, or `None` when the result does not fit a `Decimal`.
    pub fn to_usd(&self, robux: Decimal) -> Option<Decimal> {
        robux.checked_mul(self.0)
    }
}

impl Display for DevexRate {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for DevexRate {
    type Err = RateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(RateError::InvalidFormat("Value is an empty string".to_string()));
        }

        let parsed = Decimal::from_str(value).map_err(|error| {
            RateError::InvalidFormat(format!("Value is not a decimal number: {error}"))
        })?;

        DevexRate::new(parsed)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RateInput {
    Text(String),
    Number(f64)
}

impl<'de> Deserialize<'de> for DevexRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RateInput::deserialize(deserializer)? {
            RateInput::Text(value) => DevexRate::from_str(&value).map_err(de::Error::custom),
            RateInput::Number(value) => {
                let decimal = Decimal::from_f64(value)
                    .ok_or_else(|| de::Error::custom(format!("Rate error: {value} is not representable")))?;

                DevexRate::new(decimal).map_err(de::Error::custom)
            }
        }
    }
}

/// Share of gross Robux retained by the marketplace, as a fraction in `[0, 1)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MarketplaceCut(Decimal);

impl MarketplaceCut {
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value < Decimal::ZERO || value >= Decimal::ONE {
            return Err(RateError::CutOutOfRange(value));
        }

        Ok(MarketplaceCut(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Robux retained by the marketplace out of `gross`.
    pub fn of(&self, gross: Decimal) -> Option<Decimal> {
        gross.checked_mul(self.0)
    }
}

impl Default for MarketplaceCut {
    fn default() -> Self {
        MarketplaceCut(Decimal::new(30, 2))
    }
}

impl FromStr for MarketplaceCut {
    type Err = RateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = Decimal::from_str(value.trim()).map_err(|error| {
            RateError::InvalidFormat(format!("Value is not a decimal number: {error}"))
        })?;

        MarketplaceCut::new(parsed)
    }
}
