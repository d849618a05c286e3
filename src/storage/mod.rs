mod errors;
mod memory_storage;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};

use crate::billing::{Subscription, SubscriptionProduct};
use crate::devex::DevexSnapshot;
use crate::models::{Transaction, Upload};
use crate::types::{UploadId, UserId};

pub use errors::StorageError;
pub use memory_storage::MemoryStorage;

/// Persistence collaborator behind ingestion, metrics and the subscription gate.
///
/// Every call runs to completion before returning. `insert_transactions` is all-or-nothing:
/// either the whole batch becomes visible or none of it does.
pub trait Storage: Send + Sync + 'static {
    fn create_upload(&self, upload: Upload) -> Result<Upload, StorageError>;
    fn update_upload(&self, upload: &Upload) -> Result<(), StorageError>;
    fn load_upload(&self, upload_id: UploadId) -> Option<Upload>;
    fn uploads_for_user(&self, user_id: UserId) -> Vec<Upload>;

    fn insert_transactions(&self, transactions: Vec<Transaction>) -> Result<usize, StorageError>;
    fn transactions_for_user(&self, user_id: UserId) -> Vec<Transaction>;
    fn delete_demo_transactions(&self, user_id: UserId) -> Result<usize, StorageError>;
    fn purge_expired_demo(&self, now: DateTime<Utc>) -> usize;

    fn devex_rate(&self) -> Result<DevexSnapshot, StorageError>;
    fn save_devex_rate(&self, snapshot: DevexSnapshot) -> Result<(), StorageError>;

    fn subscription_for_user(&self, user_id: UserId) -> Option<Subscription>;
    fn save_subscription(&self, subscription: Subscription);
    fn subscriptions(&self) -> Vec<Subscription>;
    fn product(&self, product_id: &str) -> Option<SubscriptionProduct>;
    fn save_product(&self, product: SubscriptionProduct);
}
