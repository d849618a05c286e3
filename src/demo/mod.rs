
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::models::{BatchContext, ItemType, Transaction, TransactionDraft};
use crate::storage::{Storage, StorageError};
use crate::types::{MarketplaceCut, UserId};

pub const DEMO_TRANSACTIONS: usize = 30;
const DEMO_LIFETIME_HOURS: i64 = 24;
const HISTORY_SECONDS: i64 = 30 * 24 * 60 * 60;
const AD_SPEND_CHANCE: f64 = 0.3;

const ITEM_NAMES: [&str; 20] = [
    "Premium Sword", "Magic Staff", "Dragon Armor", "Speed Potion", "Health Pack",
    "VIP Access", "Gold Coins", "Rare Pet", "Power Boost", "Shield Upgrade",
    "Fire Spell", "Ice Spell", "Lightning Bolt", "Healing Potion", "Mana Potion",
    "Diamond Ring", "Crystal Gem", "Ancient Scroll", "Mystic Orb", "Epic Mount"
];

const ITEM_TYPES: [ItemType; 4] = [ItemType::GamePass, ItemType::DevProduct, ItemType::Ugc, ItemType::PremiumPayout];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSeed {
    pub transaction_count: usize,
    pub expires_at: DateTime<Utc>
}

/// Replaces the user's demo data with a fresh month of generated sales that expire in a day.
pub fn seed_demo<S: Storage + ?Sized, R: Rng>(storage: &S, user_id: UserId, marketplace_cut: MarketplaceCut, now: DateTime<Utc>, rng: &mut R) -> Result<DemoSeed, StorageError> {
    let snapshot = storage.devex_rate()?;
    let expires_at = now + Duration::hours(DEMO_LIFETIME_HOURS);

    let cleared = storage.delete_demo_transactions(user_id)?;

    let context = BatchContext {
        user_id,
        upload_id: None,
        devex_rate: snapshot.rate,
        marketplace_cut,
        ingested_at: now
    };

    let transactions: Vec<Transaction> = (0..DEMO_TRANSACTIONS)
        .filter_map(|_| Transaction::new(generate_draft(now, rng), &context))
        .map(|transaction| transaction.into_demo(expires_at))
        .collect();

    let transaction_count = storage.insert_transactions(transactions)?;

    info!("Seeded {transaction_count} demo transactions for user {user_id} (replaced {cleared})");

    Ok(DemoSeed { transaction_count, expires_at })
}

/// Drops every demo transaction whose expiry has passed.
pub fn purge_expired_demo<S: Storage + ?Sized>(storage: &S, now: DateTime<Utc>) -> usize {
    let purged = storage.purge_expired_demo(now);

    if purged > 0 {
        info!("Purged {purged} expired demo transactions");
    }

    purged
}

fn generate_draft<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> TransactionDraft {
    let item_type = ITEM_TYPES.choose(rng).copied().unwrap_or(ItemType::GamePass);
    let item_name = ITEM_NAMES.choose(rng).copied().unwrap_or("VIP Access");

    let ad_spend = if rng.gen_bool(AD_SPEND_CHANCE) {
        Decimal::from(rng.gen_range(10i64..60))
    } else {
        Decimal::ZERO
    };

    let occurred_at = now - Duration::seconds(rng.gen_range(0..HISTORY_SECONDS));

    TransactionDraft {
        transaction_date: occurred_at.date_naive(),
        source: item_type.to_string(),
        item_name: item_name.to_string(),
        item_type,
        gross_robux: Decimal::from(rng.gen_range(100i64..1100)),
        ad_spend
    }
}
