#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::metrics::trend;
use crate::storage::{Storage, StorageError};
use crate::types::DevexRate;

/// Relative change, in percent, at which users should hear about a new rate.
const NOTIFY_THRESHOLD_PERCENT: u32 = 5;

/// The global DevEx rate as of one update.
///
/// Ingestion reads the latest snapshot once per batch; transactions keep the rate they were
/// written with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevexSnapshot {
    pub rate: DevexRate,
    pub previous_rate: Option<DevexRate>,
    pub version: u64,
    pub updated_at: DateTime<Utc>
}

impl DevexSnapshot {
    pub fn initial(rate: DevexRate, now: DateTime<Utc>) -> Self {
        Self {
            rate,
            previous_rate: None,
            version: 1,
            updated_at: now
        }
    }

    pub fn next(&self, rate: DevexRate, now: DateTime<Utc>) -> Self {
        Self {
            rate,
            previous_rate: Some(self.rate),
            version: self.version + 1,
            updated_at: now
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateChange {
    pub old_rate: DevexRate,
    pub new_rate: DevexRate,
    pub change_percent: Decimal,
    pub notify: bool,
    pub version: u64
}

/// Publishes a new global DevEx rate.
///
/// Only future ingestions see it. The change is flagged for notification when it moves the
/// rate by five percent or more.
pub fn update_rate<S: Storage + ?Sized>(storage: &S, new_rate: DevexRate, now: DateTime<Utc>) -> Result<RateChange, StorageError> {
    let current = storage.devex_rate()?;
    let next = current.next(new_rate, now);

    let change_percent = trend(new_rate.value(), current.rate.value()).abs().round_dp(2);
    let notify = change_percent >= Decimal::from(NOTIFY_THRESHOLD_PERCENT);

    storage.save_devex_rate(next.clone())?;

    info!("DevEx rate moved from {} to {} ({change_percent}%), version {}", current.rate, new_rate, next.version);

    Ok(RateChange {
        old_rate: current.rate,
        new_rate,
        change_percent,
        notify,
        version: next.version
    })
}
