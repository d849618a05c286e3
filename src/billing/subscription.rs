use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Subscription state as reported by the payment processor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
    IncompleteExpired,
    Unpaid,
    Paused,
    Unknown
}

impl SubscriptionStatus {
    pub fn from_processor(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            "canceled" | "cancelled" => Self::Canceled,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "unpaid" => Self::Unpaid,
            "paused" => Self::Paused,
            _ => Self::Unknown
        }
    }

    /// Whether the status grants access to paid features.
    pub fn is_entitled(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

impl From<String> for SubscriptionStatus {
    fn from(status: String) -> Self {
        Self::from_processor(&status)
    }
}

/// A plan's `max_games` metadata: a number, or a label such as `unlimited`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxGames {
    Count(u32),
    Label(String)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_games: Option<MaxGames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionProduct {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub inventory_limit: Option<u32>,
    #[serde(default)]
    pub features: PlanFeatures
}

/// Local mirror of a processor-side subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: UserId,
    pub product_id: String,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub updated_at: DateTime<Utc>
}

/// A status or billing-period change pushed by the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionUpdate {
    pub user_id: UserId,
    pub product_id: String,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool
}

impl SubscriptionUpdate {
    /// Folds the update into the existing mirror record, keeping its id when there is one.
    pub fn apply(self, existing: Option<Subscription>, now: DateTime<Utc>) -> Subscription {
        Subscription {
            id: existing.map(|subscription| subscription.id).unwrap_or_else(Uuid::new_v4),
            user_id: self.user_id,
            product_id: self.product_id,
            status: self.status,
            current_period_start: self.current_period_start,
            current_period_end: self.current_period_end,
            trial_end: self.trial_end,
            cancel_at_period_end: self.cancel_at_period_end,
            updated_at: now
        }
    }
}
