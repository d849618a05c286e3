use super::{DevexRate, MarketplaceCut, RateError};
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_devex_rate_successfully_parses_valid_strings() -> Result<()> {
    let test_cases = vec![
        ("0.0035", "0.0035"),
        ("  0.0038  ", "0.0038"),
        ("1", "1"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(DevexRate::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_devex_rate_rejects_zero_negative_and_garbage() {
    assert!(matches!(DevexRate::from_str("0"), Err(RateError::NonPositive(_))));
    assert!(matches!(DevexRate::from_str("-0.0035"), Err(RateError::NonPositive(_))));
    assert!(matches!(DevexRate::from_str("abc"), Err(RateError::InvalidFormat(_))));
    assert!(matches!(DevexRate::from_str(""), Err(RateError::InvalidFormat(_))));
}

#[test]
fn test_devex_rate_converts_robux_to_usd() -> Result<()> {
    let rate = DevexRate::from_str("0.0035")?;

    assert_eq!(rate.to_usd(Decimal::from(1000)), Some(Decimal::from_str("3.5")?));
    assert_eq!(DevexRate::from_str("1000")?.to_usd(Decimal::MAX), None);

    Ok(())
}

#[test]
fn test_devex_rate_deserializes_from_string_and_number() -> Result<()> {
    let from_text: DevexRate = serde_json::from_str("\"0.0035\"")?;
    let from_number: DevexRate = serde_json::from_str("0.5")?;

    assert_eq!(from_text.value(), Decimal::from_str("0.0035")?);
    assert_eq!(from_number.value(), Decimal::from_str("0.5")?);
    assert!(serde_json::from_str::<DevexRate>("-1").is_err());

    Ok(())
}

#[test]
fn test_marketplace_cut_bounds_and_default() -> Result<()> {
    assert_eq!(MarketplaceCut::default().value(), Decimal::from_str("0.30")?);
    assert_eq!(MarketplaceCut::from_str("0")?.of(Decimal::from(100)), Some(Decimal::ZERO));
    assert_eq!(MarketplaceCut::from_str("0.3")?.of(Decimal::from(1200)), Some(Decimal::from(360)));
    assert!(MarketplaceCut::from_str("1").is_err());
    assert!(MarketplaceCut::from_str("-0.1").is_err());

    Ok(())
}
