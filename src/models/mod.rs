mod errors;
mod row;
mod transaction;
mod upload;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

pub use errors::{RejectionReason, UploadError};
pub use row::{Field, RawRow};
pub use transaction::{BatchContext, Transaction, TransactionDraft};
pub use upload::Upload;

/// Closed set of item categories a transaction can be classified into.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    GamePass,
    DevProduct,
    #[serde(rename = "UGC")]
    Ugc,
    PremiumPayout,
    Other
}

impl Display for ItemType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemType::GamePass => "GamePass",
            ItemType::DevProduct => "DevProduct",
            ItemType::Ugc => "UGC",
            ItemType::PremiumPayout => "PremiumPayout",
            ItemType::Other => "Other"
        };

        formatter.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed
}
