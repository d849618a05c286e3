mod errors;
mod rate;
#[cfg(test)]
mod tests;

use uuid::Uuid;

pub use errors::RateError;
pub use rate::{DevexRate, MarketplaceCut};

pub type UserId = Uuid;
pub type UploadId = Uuid;
pub type TransactionId = Uuid;
