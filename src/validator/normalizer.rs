use rust_decimal::Decimal;

use crate::models::{BatchContext, Field, RawRow, RejectionReason, Transaction, TransactionDraft};
use crate::validator::patterns::{classify_item, extract_ad_spend, parse_date, parse_robux};

/// Largest gross amount a single row may carry. Keeps per-user sums far inside `Decimal` range.
pub const MAX_GROSS_ROBUX: i64 = 1_000_000_000_000_000;

/// Result of judging one row on its own.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Accepted(Transaction),
    Rejected(RejectionReason)
}

/// Turns one raw row into a transaction or explains why it cannot be one.
///
/// Pure apart from id generation: the row is judged in isolation and nothing is written.
/// `index` is the 0-based position of the row in its batch and only feeds the rejection message.
pub fn normalize_row(row: &RawRow, index: usize, context: &BatchContext) -> Result<Transaction, RejectionReason> {
    let (Some(date), Some(source), Some(item_name), Some(robux)) = (
        row.field(Field::Date),
        row.field(Field::Source),
        row.field(Field::Item),
        row.field(Field::Robux)
    ) else {
        return Err(RejectionReason::missing_fields(index));
    };

    let gross_robux = parse_robux(&robux)
        .filter(|amount| *amount > Decimal::ZERO && *amount <= Decimal::from(MAX_GROSS_ROBUX))
        .ok_or_else(|| RejectionReason::invalid_amount(index))?;

    let transaction_date = parse_date(&date)
        .ok_or_else(|| RejectionReason::invalid_date(index))?;

    let explicit_ad_spend = row.field(Field::AdSpend);
    let ad_spend = extract_ad_spend(explicit_ad_spend.as_deref(), &source, &item_name);
    let item_type = classify_item(&item_name, &source);

    let draft = TransactionDraft {
        transaction_date,
        source,
        item_name,
        item_type,
        gross_robux,
        ad_spend
    };

    Transaction::new(draft, context).ok_or_else(|| RejectionReason::invalid_amount(index))
}

/// Judges every row independently; a rejected row never affects its neighbours.
pub fn validate_batch(rows: &[RawRow], context: &BatchContext) -> Vec<RowOutcome> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| match normalize_row(row, index, context) {
            Ok(transaction) => RowOutcome::Accepted(transaction),
            Err(reason) => RowOutcome::Rejected(reason)
        })
        .collect()
}
