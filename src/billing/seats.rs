use serde::Serialize;

use crate::billing::SubscriptionStatus;
use crate::storage::Storage;

const EARLY_BIRD: &str = "early_bird";
const GROWTH: &str = "growth";
const STUDIO: &str = "studio";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarlyBirdSeats {
    pub current: u32,
    pub max: u32,
    pub remaining: u32,
    pub available: bool
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatCounts {
    pub early_bird: u32,
    pub growth: u32,
    pub studio: u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatCounter {
    pub early_bird: EarlyBirdSeats,
    pub seat_counts: SeatCounts
}

/// Counts active seats per plan and what is left of the limited early-bird inventory.
///
/// `default_limit` applies when the early-bird product has no inventory limit of its own.
pub fn seat_counter<S: Storage + ?Sized>(storage: &S, default_limit: u32) -> SeatCounter {
    let active: Vec<String> = storage.subscriptions()
        .into_iter()
        .filter(|subscription| subscription.status == SubscriptionStatus::Active)
        .map(|subscription| subscription.product_id)
        .collect();

    let count = |product_id: &str| active.iter().filter(|active_id| active_id.as_str() == product_id).count() as u32;

    let current = count(EARLY_BIRD);
    let max = storage.product(EARLY_BIRD)
        .and_then(|product| product.inventory_limit)
        .unwrap_or(default_limit);
    let remaining = max.saturating_sub(current);

    SeatCounter {
        early_bird: EarlyBirdSeats {
            current,
            max,
            remaining,
            available: remaining > 0
        },
        seat_counts: SeatCounts {
            early_bird: current,
            growth: count(GROWTH),
            studio: count(STUDIO)
        }
    }
}
