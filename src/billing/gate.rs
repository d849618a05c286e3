use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::billing::{MaxGames, PlanFeatures, SubscriptionStatus};
use crate::storage::Storage;
use crate::types::UserId;

const DEFAULT_RETENTION_DAYS: u32 = 30;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSummary {
    pub id: Uuid,
    pub product_id: String,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub plan_name: Option<String>,
    pub trial_days_remaining: i64
}

/// Read-side answer to "may this user use paid features right now".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCheck {
    pub has_active_subscription: bool,
    pub subscription: Option<SubscriptionSummary>,
    pub plan_features: Option<PlanFeatures>
}

impl SubscriptionCheck {
    pub fn gate(&self) -> FeatureGate<'_> {
        FeatureGate { check: self }
    }
}

/// Looks up the user's subscription and reports it only while it is active or trialing.
pub fn check_subscription<S: Storage + ?Sized>(storage: &S, user_id: UserId, now: DateTime<Utc>) -> SubscriptionCheck {
    let Some(subscription) = storage.subscription_for_user(user_id).filter(|subscription| subscription.status.is_entitled()) else {
        return SubscriptionCheck {
            has_active_subscription: false,
            subscription: None,
            plan_features: None
        };
    };

    let product = storage.product(&subscription.product_id);
    let trial_days_remaining = subscription.trial_end
        .map(|trial_end| days_until(trial_end, now))
        .unwrap_or(0);

    SubscriptionCheck {
        has_active_subscription: true,
        plan_features: Some(product.as_ref().map(|product| product.features.clone()).unwrap_or_default()),
        subscription: Some(SubscriptionSummary {
            id: subscription.id,
            product_id: subscription.product_id,
            status: subscription.status,
            current_period_end: subscription.current_period_end,
            trial_end: subscription.trial_end,
            cancel_at_period_end: subscription.cancel_at_period_end,
            plan_name: product.map(|product| product.name),
            trial_days_remaining
        })
    }
}

/// Whole days left until `deadline`, rounded up and never negative.
fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (deadline - now).num_seconds();

    if seconds <= 0 {
        return 0;
    }

    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameAllowance {
    Limited(u32),
    Unlimited
}

/// Plan-derived feature limits for one subscription check.
pub struct FeatureGate<'a> {
    check: &'a SubscriptionCheck
}

impl FeatureGate<'_> {
    fn features(&self) -> Option<&PlanFeatures> {
        if !self.check.has_active_subscription {
            return None;
        }

        self.check.plan_features.as_ref()
    }

    pub fn can_upload(&self) -> bool {
        self.check.has_active_subscription
    }

    pub fn max_games(&self) -> GameAllowance {
        let Some(features) = self.features() else {
            return GameAllowance::Limited(0);
        };

        match &features.max_games {
            Some(MaxGames::Label(label)) if label.eq_ignore_ascii_case("unlimited") => GameAllowance::Unlimited,
            Some(MaxGames::Count(count)) if *count > 0 => GameAllowance::Limited(*count),
            _ => GameAllowance::Limited(1)
        }
    }

    pub fn retention_days(&self) -> u32 {
        self.features()
            .and_then(|features| features.retention_days)
            .unwrap_or(DEFAULT_RETENTION_DAYS)
    }

    pub fn has_auto_sync(&self) -> bool {
        self.features()
            .and_then(|features| features.auto_sync.as_deref())
            .is_some_and(|mode| matches!(mode, "enabled" | "daily" | "realtime"))
    }

    pub fn team_seats(&self) -> u32 {
        self.features()
            .and_then(|features| features.seats)
            .filter(|seats| *seats > 0)
            .unwrap_or(1)
    }

    pub fn is_trialing(&self) -> bool {
        self.check.subscription.as_ref()
            .is_some_and(|subscription| subscription.status == SubscriptionStatus::Trialing)
    }

    pub fn trial_days_remaining(&self) -> i64 {
        self.check.subscription.as_ref()
            .map(|subscription| subscription.trial_days_remaining)
            .unwrap_or(0)
    }
}
