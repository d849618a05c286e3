use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::billing::{Subscription, SubscriptionProduct};
use crate::devex::DevexSnapshot;
use crate::models::{Transaction, Upload};
use crate::storage::{Storage, StorageError};
use crate::types::{UploadId, UserId};

/// In-process storage backed by `DashMap`.
///
/// Transactions are partitioned per user, so a batch for one user is appended while holding
/// that user's shard entry and becomes visible in one step.
pub struct MemoryStorage {
    uploads: DashMap<UploadId, Upload>,
    transactions: DashMap<UserId, Vec<Transaction>>,
    devex_rate: RwLock<Option<DevexSnapshot>>,
    subscriptions: DashMap<UserId, Subscription>,
    products: DashMap<String, SubscriptionProduct>
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            uploads: DashMap::new(),
            transactions: DashMap::new(),
            devex_rate: RwLock::new(None),
            subscriptions: DashMap::new(),
            products: DashMap::new()
        }
    }

    pub fn with_devex_rate(snapshot: DevexSnapshot) -> Self {
        Self {
            devex_rate: RwLock::new(Some(snapshot)),
            ..Self::new()
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn create_upload(&self, upload: Upload) -> Result<Upload, StorageError> {
        self.uploads.insert(upload.id, upload.clone());
        Ok(upload)
    }

    fn update_upload(&self, upload: &Upload) -> Result<(), StorageError> {
        let mut stored = self.uploads.get_mut(&upload.id)
            .ok_or(StorageError::UploadNotFound(upload.id))?;

        *stored = upload.clone();

        Ok(())
    }

    fn load_upload(&self, upload_id: UploadId) -> Option<Upload> {
        self.uploads.get(&upload_id).map(|entry| entry.value().clone())
    }

    fn uploads_for_user(&self, user_id: UserId) -> Vec<Upload> {
        let mut uploads: Vec<Upload> = self.uploads.iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        uploads.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        uploads
    }

    fn insert_transactions(&self, transactions: Vec<Transaction>) -> Result<usize, StorageError> {
        let count = transactions.len();
        let mut batches: HashMap<UserId, Vec<Transaction>> = HashMap::new();

        for transaction in transactions {
            batches.entry(transaction.user_id).or_default().push(transaction);
        }

        for (user_id, batch) in batches {
            self.transactions.entry(user_id).or_default().extend(batch);
        }

        Ok(count)
    }

    fn transactions_for_user(&self, user_id: UserId) -> Vec<Transaction> {
        self.transactions.get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn delete_demo_transactions(&self, user_id: UserId) -> Result<usize, StorageError> {
        let Some(mut entry) = self.transactions.get_mut(&user_id) else {
            return Ok(0);
        };

        let before = entry.len();
        entry.retain(|transaction| !transaction.demo_data);

        Ok(before - entry.len())
    }

    fn purge_expired_demo(&self, now: DateTime<Utc>) -> usize {
        let mut purged = 0;

        for mut entry in self.transactions.iter_mut() {
            let before = entry.len();
            entry.retain(|transaction| !transaction.is_expired(now));
            purged += before - entry.len();
        }

        purged
    }

    fn devex_rate(&self) -> Result<DevexSnapshot, StorageError> {
        let guard = self.devex_rate.read().map_err(|_| StorageError::Poisoned)?;

        guard.clone().ok_or(StorageError::RateMissing)
    }

    fn save_devex_rate(&self, snapshot: DevexSnapshot) -> Result<(), StorageError> {
        let mut guard = self.devex_rate.write().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(snapshot);

        Ok(())
    }

    fn subscription_for_user(&self, user_id: UserId) -> Option<Subscription> {
        self.subscriptions.get(&user_id).map(|entry| entry.value().clone())
    }

    fn save_subscription(&self, subscription: Subscription) {
        self.subscriptions.insert(subscription.user_id, subscription);
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.iter().map(|entry| entry.value().clone()).collect()
    }

    fn product(&self, product_id: &str) -> Option<SubscriptionProduct> {
        self.products.get(product_id).map(|entry| entry.value().clone())
    }

    fn save_product(&self, product: SubscriptionProduct) {
        self.products.insert(product.product_id.clone(), product);
    }
}
