use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::ItemType;

static AD_SPEND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bads?\b\s*[:$]?\s*\$?\s*(\d+(?:\.\d+)?)").expect("ad spend pattern compiles")
});

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATE_TIME_FORMATS: [&str; 2] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

//NOTE: Order is priority, the first category with a matching keyword wins.
const ITEM_KEYWORDS: [(ItemType, &[&str]); 4] = [
    (ItemType::GamePass, &["gamepass", "game pass"]),
    (ItemType::DevProduct, &["devproduct", "dev product", "developer product"]),
    (ItemType::Ugc, &["ugc"]),
    (ItemType::PremiumPayout, &["premium"]),
];

/// Parses a gross Robux amount after dropping formatting such as `R$`, spaces and thousands separators.
pub fn parse_robux(value: &str) -> Option<Decimal> {
    let cleaned: String = value.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Parses a transaction date and drops any time of day.
///
/// Timestamps carrying an offset are converted to UTC before truncation.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    let date_time = DATE_TIME_FORMATS.iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());

    if let Some(date_time) = date_time {
        return Some(date_time.date());
    }

    DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Derives USD ad spend for a row.
///
/// An explicit column wins when it holds a non-negative number, then an `Ad: $N` style mention
/// in the source, then in the item name. Anything else is zero.
pub fn extract_ad_spend(explicit: Option<&str>, source: &str, item_name: &str) -> Decimal {
    if let Some(amount) = explicit.and_then(parse_explicit_ad_spend) {
        return amount;
    }

    [source, item_name].into_iter()
        .find_map(match_ad_spend)
        .unwrap_or(Decimal::ZERO)
}

/// Classifies a row by keyword, checking item name and source together.
pub fn classify_item(item_name: &str, source: &str) -> ItemType {
    let item_name = item_name.to_lowercase();
    let source = source.to_lowercase();

    ITEM_KEYWORDS.iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|keyword| item_name.contains(keyword) || source.contains(keyword))
        })
        .map(|(item_type, _)| *item_type)
        .unwrap_or(ItemType::Other)
}

fn parse_explicit_ad_spend(value: &str) -> Option<Decimal> {
    let cleaned: String = value.chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).ok().filter(|amount| !amount.is_sign_negative())
}

fn match_ad_spend(text: &str) -> Option<Decimal> {
    let captures = AD_SPEND.captures(text)?;

    Decimal::from_str(captures.get(1)?.as_str()).ok()
}
