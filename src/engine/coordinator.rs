use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::IngestionError;
use crate::models::{BatchContext, RawRow, Upload};
use crate::storage::Storage;
use crate::types::{DevexRate, MarketplaceCut, UploadId, UserId};
use crate::validator::{validate_batch, RowOutcome};

/// Most rejection messages handed back to a caller; the count is always complete.
pub const MAX_REPORTED_ERRORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionSummary {
    pub upload_id: UploadId,
    pub processed_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>
}

/// Drives one uploaded batch from raw rows to persisted transactions.
///
/// Rows are judged independently, then every accepted row is written in a single insert.
/// The upload record ends `completed` or `failed` depending on that insert.
pub struct IngestionCoordinator<S: Storage + ?Sized> {
    storage: Arc<S>,
    marketplace_cut: MarketplaceCut
}

impl<S: Storage + ?Sized> Clone for IngestionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            marketplace_cut: self.marketplace_cut
        }
    }
}

impl<S: Storage + ?Sized> IngestionCoordinator<S> {
    pub fn new(storage: Arc<S>, marketplace_cut: MarketplaceCut) -> Self {
        Self {
            storage,
            marketplace_cut
        }
    }

    /// Looks up the current DevEx rate once, opens an upload and ingests the rows into it.
    ///
    /// A failed rate lookup aborts before any upload record exists.
    pub fn process(&self, user_id: UserId, filename: &str, rows: &[RawRow]) -> Result<IngestionSummary, IngestionError> {
        let snapshot = self.storage.devex_rate().map_err(IngestionError::RateLookup)?;
        let upload = self.begin_upload(user_id, filename, rows.len())?;

        self.ingest(upload.id, rows, snapshot.rate, user_id)
    }

    pub fn begin_upload(&self, user_id: UserId, filename: &str, row_count: usize) -> Result<Upload, IngestionError> {
        let upload = Upload::new(user_id, filename, row_count, Utc::now());

        let upload = self.storage.create_upload(upload).map_err(|source| {
            error!("Could not create upload record for '{filename}': {source}");
            IngestionError::UploadCreation(source)
        })?;

        info!("Created upload [{}] for '{filename}' with {row_count} rows", upload.id);

        Ok(upload)
    }

    pub fn ingest(&self, upload_id: UploadId, rows: &[RawRow], devex_rate: DevexRate, user_id: UserId) -> Result<IngestionSummary, IngestionError> {
        let mut upload = self.storage.load_upload(upload_id)
            .filter(|upload| upload.user_id == user_id)
            .ok_or(IngestionError::UploadNotFound(upload_id))?;

        upload.ensure_processing()?;

        let context = BatchContext {
            user_id,
            upload_id: Some(upload_id),
            devex_rate,
            marketplace_cut: self.marketplace_cut,
            ingested_at: Utc::now()
        };

        let mut accepted = Vec::new();
        let mut rejections = Vec::new();

        for outcome in validate_batch(rows, &context) {
            match outcome {
                RowOutcome::Accepted(transaction) => accepted.push(transaction),
                RowOutcome::Rejected(reason) => {
                    warn!("Upload [{upload_id}] {reason}");
                    rejections.push(reason);
                }
            }
        }

        let processed_count = accepted.len();

        if !accepted.is_empty() {
            if let Err(source) = self.storage.insert_transactions(accepted) {
                let message = source.to_string();
                error!("Bulk insert for upload [{upload_id}] failed: {message}");

                upload.fail(message.clone())?;

                //NOTE: If this update fails too the upload stays in `processing`; nothing sweeps it later.
                if let Err(update_error) = self.storage.update_upload(&upload) {
                    error!("Could not mark upload [{upload_id}] as failed: {update_error}");
                }

                return Err(IngestionError::Insert { upload_id, message });
            }
        }

        upload.complete(processed_count)?;

        self.storage.update_upload(&upload).map_err(|source| {
            error!("Could not mark upload [{upload_id}] as completed: {source}");
            IngestionError::StatusUpdate { upload_id, source }
        })?;

        info!("Upload [{upload_id}] accepted {processed_count} of {} rows", rows.len());

        Ok(IngestionSummary {
            upload_id,
            processed_count,
            error_count: rejections.len(),
            errors: rejections.iter()
                .take(MAX_REPORTED_ERRORS)
                .map(ToString::to_string)
                .collect()
        })
    }
}
