use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::ItemType;
use crate::types::{DevexRate, MarketplaceCut, TransactionId, UploadId, UserId};

/// Values shared by every transaction written in one batch.
///
/// The DevEx rate is looked up once per batch and copied into each transaction, so later rate
/// changes never rewrite history.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub user_id: UserId,
    pub upload_id: Option<UploadId>,
    pub devex_rate: DevexRate,
    pub marketplace_cut: MarketplaceCut,
    pub ingested_at: DateTime<Utc>
}

/// The validated, row-specific part of a transaction before batch values are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub transaction_date: NaiveDate,
    pub source: String,
    pub item_name: String,
    pub item_type: ItemType,
    pub gross_robux: Decimal,
    pub ad_spend: Decimal
}

/// A normalized, persisted unit of revenue.
///
/// Net figures are derived once at construction and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub upload_id: Option<UploadId>,
    pub transaction_date: NaiveDate,
    pub source: String,
    pub item_name: String,
    pub item_type: ItemType,
    /// Gross revenue in Robux before the marketplace cut.
    pub gross_robux: Decimal,
    /// Robux retained by the marketplace.
    pub marketplace_cut: Decimal,
    pub net_robux: Decimal,
    /// Advertising spend in USD.
    pub ad_spend: Decimal,
    pub devex_rate: DevexRate,
    pub gross_usd: Decimal,
    pub net_usd: Decimal,
    pub demo_data: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>
}

impl Transaction {
    /// Attaches batch values and derives the net figures.
    ///
    /// Returns `None` when a derived figure does not fit a `Decimal`.
    pub fn new(draft: TransactionDraft, context: &BatchContext) -> Option<Self> {
        let marketplace_cut = context.marketplace_cut.of(draft.gross_robux)?;
        let net_robux = draft.gross_robux.checked_sub(marketplace_cut)?;
        let gross_usd = context.devex_rate.to_usd(draft.gross_robux)?;
        let net_usd = context.devex_rate.to_usd(net_robux)?;

        Some(Self {
            id: Uuid::new_v4(),
            user_id: context.user_id,
            upload_id: context.upload_id,
            transaction_date: draft.transaction_date,
            source: draft.source,
            item_name: draft.item_name,
            item_type: draft.item_type,
            gross_robux: draft.gross_robux,
            marketplace_cut,
            net_robux,
            ad_spend: draft.ad_spend,
            devex_rate: context.devex_rate,
            gross_usd,
            net_usd,
            demo_data: false,
            expires_at: None,
            created_at: context.ingested_at
        })
    }

    /// Marks the transaction as demo data that may be purged after `expires_at`.
    pub fn into_demo(mut self, expires_at: DateTime<Utc>) -> Self {
        self.demo_data = true;
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.demo_data && self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}
