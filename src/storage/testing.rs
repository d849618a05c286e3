use chrono::{DateTime, Utc};

use crate::billing::{Subscription, SubscriptionProduct};
use crate::devex::DevexSnapshot;
use crate::models::{Transaction, Upload};
use crate::storage::{MemoryStorage, Storage, StorageError};
use crate::types::{UploadId, UserId};

/// Wraps `MemoryStorage` and fails selected operations on demand.
pub struct FaultyStorage {
    pub inner: MemoryStorage,
    pub fail_create_upload: bool,
    pub fail_insert: Option<String>,
    pub fail_rate_lookup: bool
}

impl FaultyStorage {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            fail_create_upload: false,
            fail_insert: None,
            fail_rate_lookup: false
        }
    }
}

impl Storage for FaultyStorage {
    fn create_upload(&self, upload: Upload) -> Result<Upload, StorageError> {
        if self.fail_create_upload {
            return Err(StorageError::Backend("connection refused".to_string()));
        }

        self.inner.create_upload(upload)
    }

    fn update_upload(&self, upload: &Upload) -> Result<(), StorageError> {
        self.inner.update_upload(upload)
    }

    fn load_upload(&self, upload_id: UploadId) -> Option<Upload> {
        self.inner.load_upload(upload_id)
    }

    fn uploads_for_user(&self, user_id: UserId) -> Vec<Upload> {
        self.inner.uploads_for_user(user_id)
    }

    fn insert_transactions(&self, transactions: Vec<Transaction>) -> Result<usize, StorageError> {
        if let Some(message) = &self.fail_insert {
            return Err(StorageError::Backend(message.clone()));
        }

        self.inner.insert_transactions(transactions)
    }

    fn transactions_for_user(&self, user_id: UserId) -> Vec<Transaction> {
        self.inner.transactions_for_user(user_id)
    }

    fn delete_demo_transactions(&self, user_id: UserId) -> Result<usize, StorageError> {
        self.inner.delete_demo_transactions(user_id)
    }

    fn purge_expired_demo(&self, now: DateTime<Utc>) -> usize {
        self.inner.purge_expired_demo(now)
    }

    fn devex_rate(&self) -> Result<DevexSnapshot, StorageError> {
        if self.fail_rate_lookup {
            return Err(StorageError::Backend("settings table unavailable".to_string()));
        }

        self.inner.devex_rate()
    }

    fn save_devex_rate(&self, snapshot: DevexSnapshot) -> Result<(), StorageError> {
        self.inner.save_devex_rate(snapshot)
    }

    fn subscription_for_user(&self, user_id: UserId) -> Option<Subscription> {
        self.inner.subscription_for_user(user_id)
    }

    fn save_subscription(&self, subscription: Subscription) {
        self.inner.save_subscription(subscription)
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        self.inner.subscriptions()
    }

    fn product(&self, product_id: &str) -> Option<SubscriptionProduct> {
        self.inner.product(product_id)
    }

    fn save_product(&self, product: SubscriptionProduct) {
        self.inner.save_product(product)
    }
}
