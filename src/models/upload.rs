use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::errors::UploadError;
use crate::models::UploadStatus;
use crate::types::{UploadId, UserId};

/// One ingestion attempt for a single submitted file.
///
/// Starts in `processing` and moves exactly once to `completed` or `failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upload {
    pub id: UploadId,
    pub user_id: UserId,
    pub filename: String,
    /// Row count as submitted, rewritten to the accepted count on completion.
    pub total_transactions: usize,
    pub processing_status: UploadStatus,
    pub error_message: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>
}

impl Upload {
    pub fn new(user_id: UserId, filename: impl Into<String>, row_count: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            filename: filename.into(),
            total_transactions: row_count,
            processing_status: UploadStatus::Processing,
            error_message: None,
            upload_date: now,
            created_at: now
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing_status == UploadStatus::Processing
    }

    pub fn complete(&mut self, accepted: usize) -> Result<(), UploadError> {
        self.ensure_processing()?;

        self.processing_status = UploadStatus::Completed;
        self.total_transactions = accepted;

        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), UploadError> {
        self.ensure_processing()?;

        self.processing_status = UploadStatus::Failed;
        self.error_message = Some(message.into());

        Ok(())
    }

    pub fn ensure_processing(&self) -> Result<(), UploadError> {
        if !self.is_processing() {
            return Err(UploadError::AlreadyFinalized {
                upload_id: self.id,
                status: self.processing_status
            });
        }

        Ok(())
    }
}
