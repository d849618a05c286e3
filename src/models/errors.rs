use crate::models::UploadStatus;
use crate::types::UploadId;
use thiserror::Error;

/// Why a single CSV row was not turned into a transaction.
///
/// `row` is 1-based so the rendered message matches what a person sees in a spreadsheet.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RejectionReason {
    #[error("Row {row}: Missing required fields")]
    MissingFields {
        row: usize
    },
    #[error("Row {row}: Invalid Robux amount")]
    InvalidAmount {
        row: usize
    },
    #[error("Row {row}: Invalid date format")]
    InvalidDate {
        row: usize
    }
}

impl RejectionReason {
    //NOTE: All constructors take the 0-based position of the row inside the submitted batch.

    pub fn missing_fields(index: usize) -> Self {
        Self::MissingFields { row: index + 1 }
    }

    pub fn invalid_amount(index: usize) -> Self {
        Self::InvalidAmount { row: index + 1 }
    }

    pub fn invalid_date(index: usize) -> Self {
        Self::InvalidDate { row: index + 1 }
    }

    pub fn row(&self) -> usize {
        match self {
            Self::MissingFields { row } | Self::InvalidAmount { row } | Self::InvalidDate { row } => *row
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload [{upload_id}] is already {status:?} and cannot change status again")]
    AlreadyFinalized {
        upload_id: UploadId,
        status: UploadStatus
    }
}
