mod normalizer;
mod patterns;

pub use normalizer::{normalize_row, validate_batch, RowOutcome, MAX_GROSS_ROBUX};
pub use patterns::{classify_item, extract_ad_spend, parse_date, parse_robux};
