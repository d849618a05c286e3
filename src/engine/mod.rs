mod coordinator;
mod csv_source;
mod errors;

pub use coordinator::{IngestionCoordinator, IngestionSummary, MAX_REPORTED_ERRORS};
pub use csv_source::CsvSource;
pub use errors::IngestionError;
