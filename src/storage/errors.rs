use thiserror::Error;

use crate::types::UploadId;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Upload [{0}] was not found")]
    UploadNotFound(UploadId),
    #[error("DevEx rate has not been configured")]
    RateMissing,
    #[error("Storage lock was poisoned")]
    Poisoned,
    #[error("{0}")]
    Backend(String)
}
