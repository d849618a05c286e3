use super::{MemoryStorage, Storage, StorageError};

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::devex::DevexSnapshot;
use crate::models::{BatchContext, ItemType, Transaction, TransactionDraft, Upload, UploadStatus};
use crate::types::{DevexRate, MarketplaceCut, UserId};

fn create_transaction(user_id: UserId, gross_robux: i64) -> Result<Transaction> {
    let context = BatchContext {
        user_id,
        upload_id: None,
        devex_rate: DevexRate::from_str("0.0035")?,
        marketplace_cut: MarketplaceCut::default(),
        ingested_at: Utc::now()
    };

    let draft = TransactionDraft {
        transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).ok_or_else(|| anyhow!("bad date"))?,
        source: "Developer Product".to_string(),
        item_name: "Coins".to_string(),
        item_type: ItemType::DevProduct,
        gross_robux: Decimal::from(gross_robux),
        ad_spend: Decimal::ZERO
    };

    Transaction::new(draft, &context).ok_or_else(|| anyhow!("transaction overflowed"))
}

#[test]
fn test_upload_create_update_and_load() -> Result<()> {
    let storage = MemoryStorage::new();
    let user_id = Uuid::new_v4();

    let created = storage.create_upload(Upload::new(user_id, "sales.csv", 5, Utc::now()))?;
    assert!(storage.load_upload(Uuid::new_v4()).is_none());

    let mut upload = storage.load_upload(created.id).ok_or_else(|| anyhow!("upload missing"))?;
    upload.complete(4)?;
    storage.update_upload(&upload)?;

    let stored = storage.load_upload(created.id).ok_or_else(|| anyhow!("upload missing"))?;

    assert_eq!(stored.processing_status, UploadStatus::Completed);
    assert_eq!(stored.total_transactions, 4);

    Ok(())
}

#[test]
fn test_update_of_unknown_upload_fails() {
    let storage = MemoryStorage::new();
    let upload = Upload::new(Uuid::new_v4(), "ghost.csv", 1, Utc::now());

    assert!(matches!(storage.update_upload(&upload), Err(StorageError::UploadNotFound(id)) if id == upload.id));
}

#[test]
fn test_uploads_for_user_are_newest_first_and_scoped() -> Result<()> {
    let storage = MemoryStorage::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    storage.create_upload(Upload::new(user_id, "old.csv", 1, now - Duration::days(2)))?;
    storage.create_upload(Upload::new(user_id, "new.csv", 1, now))?;
    storage.create_upload(Upload::new(Uuid::new_v4(), "other.csv", 1, now))?;

    let uploads = storage.uploads_for_user(user_id);

    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].filename, "new.csv");
    assert_eq!(uploads[1].filename, "old.csv");

    Ok(())
}

#[test]
fn test_insert_batch_is_partitioned_per_user() -> Result<()> {
    let storage = MemoryStorage::new();
    let first_user = Uuid::new_v4();
    let second_user = Uuid::new_v4();

    let inserted = storage.insert_transactions(vec![
        create_transaction(first_user, 100)?,
        create_transaction(second_user, 200)?,
        create_transaction(first_user, 300)?
    ])?;

    assert_eq!(inserted, 3);
    assert_eq!(storage.transaction_count(), 3);
    assert_eq!(storage.transactions_for_user(first_user).len(), 2);
    assert_eq!(storage.transactions_for_user(second_user).len(), 1);
    assert!(storage.transactions_for_user(Uuid::new_v4()).is_empty());

    Ok(())
}

#[test]
fn test_demo_rows_can_be_deleted_and_purged_without_touching_real_rows() -> Result<()> {
    let storage = MemoryStorage::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    storage.insert_transactions(vec![
        create_transaction(user_id, 100)?,
        create_transaction(user_id, 200)?.into_demo(now - Duration::hours(1)),
        create_transaction(user_id, 300)?.into_demo(now + Duration::hours(1))
    ])?;

    assert_eq!(storage.purge_expired_demo(now), 1);
    assert_eq!(storage.transactions_for_user(user_id).len(), 2);

    assert_eq!(storage.delete_demo_transactions(user_id)?, 1);
    assert_eq!(storage.delete_demo_transactions(Uuid::new_v4())?, 0);

    let remaining = storage.transactions_for_user(user_id);

    assert_eq!(remaining.len(), 1);
    assert!(!remaining[0].demo_data);

    Ok(())
}

#[test]
fn test_devex_rate_must_be_configured_before_lookup() -> Result<()> {
    let storage = MemoryStorage::new();

    assert!(matches!(storage.devex_rate(), Err(StorageError::RateMissing)));

    storage.save_devex_rate(DevexSnapshot::initial(DevexRate::from_str("0.0035")?, Utc::now()))?;

    assert_eq!(storage.devex_rate()?.version, 1);

    Ok(())
}
