use thiserror::Error;

use crate::models::UploadError;
use crate::storage::StorageError;
use crate::types::UploadId;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to look up DevEx rate: {0}")]
    RateLookup(#[source] StorageError),
    #[error("Failed to create upload record: {0}")]
    UploadCreation(#[source] StorageError),
    #[error("Upload [{0}] was not found for this user")]
    UploadNotFound(UploadId),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Failed to insert transactions for upload [{upload_id}]: {message}")]
    Insert {
        upload_id: UploadId,
        message: String
    },
    #[error("Failed to update status of upload [{upload_id}]: {source}")]
    StatusUpdate {
        upload_id: UploadId,
        #[source]
        source: StorageError
    }
}
