use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate error: {0}")]
    InvalidFormat(String),
    #[error("Rate error: DevEx rate must be positive, got {0}")]
    NonPositive(Decimal),
    #[error("Rate error: marketplace cut must be within [0, 1), got {0}")]
    CutOutOfRange(Decimal)
}
