use super::{update_rate, DevexSnapshot};

use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::storage::{MemoryStorage, Storage, StorageError};
use crate::types::DevexRate;

fn create_storage(rate: &str) -> Result<MemoryStorage> {
    Ok(MemoryStorage::with_devex_rate(DevexSnapshot::initial(DevexRate::from_str(rate)?, Utc::now())))
}

#[test]
fn test_update_rate_versions_snapshot_and_keeps_previous() -> Result<()> {
    let storage = create_storage("0.0035")?;

    let change = update_rate(&storage, DevexRate::from_str("0.0036")?, Utc::now())?;
    let snapshot = storage.devex_rate()?;

    assert_eq!(change.version, 2);
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.rate, DevexRate::from_str("0.0036")?);
    assert_eq!(snapshot.previous_rate, Some(DevexRate::from_str("0.0035")?));

    Ok(())
}

#[test]
fn test_small_change_does_not_notify() -> Result<()> {
    let storage = create_storage("0.0035")?;
    let change = update_rate(&storage, DevexRate::from_str("0.0036")?, Utc::now())?;

    assert_eq!(change.change_percent, Decimal::from_str("2.86")?);
    assert!(!change.notify);

    Ok(())
}

#[test]
fn test_change_of_five_percent_or_more_notifies_in_either_direction() -> Result<()> {
    let storage = create_storage("0.0040")?;

    let drop = update_rate(&storage, DevexRate::from_str("0.0038")?, Utc::now())?;

    assert_eq!(drop.change_percent, Decimal::from(5));
    assert!(drop.notify);

    let rise = update_rate(&storage, DevexRate::from_str("0.0050")?, Utc::now())?;

    assert!(rise.notify);
    assert_eq!(rise.version, 3);

    Ok(())
}

#[test]
fn test_update_without_configured_rate_fails() -> Result<()> {
    let storage = MemoryStorage::new();
    let result = update_rate(&storage, DevexRate::from_str("0.0035")?, Utc::now());

    assert!(matches!(result, Err(StorageError::RateMissing)));

    Ok(())
}
