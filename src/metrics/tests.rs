use super::{monthly_rollup, roi, summarize, top_items, totals, trend, weekly_report};

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{BatchContext, ItemType, Transaction, TransactionDraft};
use crate::types::{DevexRate, MarketplaceCut};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| anyhow!("bad date {year}-{month}-{day}"))
}

fn create_transaction(item_name: &str, transaction_date: NaiveDate, gross_robux: i64, ad_spend: &str, rate: &str) -> Result<Transaction> {
    let context = BatchContext {
        user_id: Uuid::nil(),
        upload_id: None,
        devex_rate: DevexRate::from_str(rate)?,
        marketplace_cut: MarketplaceCut::default(),
        ingested_at: Utc::now()
    };

    let draft = TransactionDraft {
        transaction_date,
        source: "Game Pass".to_string(),
        item_name: item_name.to_string(),
        item_type: ItemType::GamePass,
        gross_robux: Decimal::from(gross_robux),
        ad_spend: Decimal::from_str(ad_spend)?
    };

    Transaction::new(draft, &context).ok_or_else(|| anyhow!("transaction overflowed"))
}

#[test]
fn test_roi_guards_against_zero_spend() -> Result<()> {
    assert_eq!(roi(Decimal::from(150), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(roi(Decimal::from(150), Decimal::from(50)), Decimal::from(200));
    assert_eq!(roi(Decimal::from(25), Decimal::from(50)), Decimal::from(-50));

    Ok(())
}

#[test]
fn test_trend_guards_against_zero_baseline() -> Result<()> {
    assert_eq!(trend(Decimal::from(10), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(trend(Decimal::from(150), Decimal::from(100)), Decimal::from(50));
    assert_eq!(trend(Decimal::from(75), Decimal::from(100)), Decimal::from(-25));

    Ok(())
}

#[test]
fn test_monthly_rollup_groups_by_calendar_month_in_order() -> Result<()> {
    let transactions = vec![
        create_transaction("VIP", date(2024, 2, 10)?, 1000, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 1, 31)?, 1000, "5", "0.0035")?,
        create_transaction("Coins", date(2024, 1, 1)?, 2000, "0", "0.0045")?
    ];

    let months = monthly_rollup(&transactions);

    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, date(2024, 1, 1)?);
    assert_eq!(months[0].totals.transactions, 2);
    assert_eq!(months[0].totals.gross_robux, Decimal::from(3000));
    assert_eq!(months[0].totals.marketplace_cut, Decimal::from(900));
    assert_eq!(months[0].totals.net_robux, Decimal::from(2100));
    assert_eq!(months[0].totals.ad_spend, Decimal::from(5));
    assert_eq!(months[0].totals.net_usd, Decimal::from_str("8.75")?);
    assert_eq!(months[0].totals.avg_devex_rate, Decimal::from_str("0.004")?);
    assert_eq!(months[1].month, date(2024, 2, 1)?);
    assert_eq!(months[1].totals.transactions, 1);

    Ok(())
}

#[test]
fn test_monthly_rollup_is_idempotent() -> Result<()> {
    let transactions = vec![
        create_transaction("VIP", date(2024, 3, 3)?, 1234, "1.5", "0.0035")?,
        create_transaction("Sword", date(2024, 4, 4)?, 999, "0", "0.0038")?
    ];

    assert_eq!(monthly_rollup(&transactions), monthly_rollup(&transactions));
    assert_eq!(totals(&transactions), totals(&transactions));

    Ok(())
}

#[test]
fn test_empty_input_yields_zero_totals() {
    let summary = summarize(&[], 10);

    assert_eq!(summary.totals.transactions, 0);
    assert_eq!(summary.totals.avg_devex_rate, Decimal::ZERO);
    assert_eq!(summary.roi, Decimal::ZERO);
    assert!(summary.top_items.is_empty());
    assert!(monthly_rollup(&[]).is_empty());
}

#[test]
fn test_top_items_sorted_by_net_usd_with_stable_ties_and_truncation() -> Result<()> {
    let day = date(2024, 5, 5)?;
    let transactions = vec![
        create_transaction("Alpha", day, 1000, "0", "0.0035")?,
        create_transaction("Beta", day, 3000, "0", "0.0035")?,
        create_transaction("Gamma", day, 1000, "0", "0.0035")?,
        create_transaction("Alpha", day, 500, "1", "0.0035")?,
        create_transaction("Delta", day, 100, "0", "0.0035")?
    ];

    let items = top_items(&transactions, 3);
    let names: Vec<&str> = items.iter().map(|item| item.item_name.as_str()).collect();

    assert_eq!(names, vec!["Beta", "Alpha", "Gamma"]);
    assert_eq!(items[1].totals.transactions, 2);
    assert_eq!(items[1].totals.net_usd, Decimal::from_str("3.675")?);
    assert_eq!(items[1].roi, Decimal::from_str("267.5")?);
    assert_eq!(items[0].item_type, ItemType::GamePass);

    let ties = vec![
        create_transaction("First", day, 1000, "0", "0.0035")?,
        create_transaction("Second", day, 1000, "0", "0.0035")?
    ];
    let ranked: Vec<String> = top_items(&ties, 5).into_iter().map(|item| item.item_name).collect();

    assert_eq!(ranked, vec!["First".to_string(), "Second".to_string()]);

    Ok(())
}

#[test]
fn test_summary_reports_month_over_month_and_waterfall() -> Result<()> {
    let transactions = vec![
        create_transaction("VIP", date(2024, 1, 15)?, 1000, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 2, 15)?, 2000, "2", "0.0035")?
    ];

    let summary = summarize(&transactions, 10);

    assert_eq!(summary.month_over_month, Decimal::from(100));
    assert_eq!(summary.totals.net_usd, Decimal::from_str("7.35")?);
    assert_eq!(summary.roi, Decimal::from_str("267.5")?);
    assert_eq!(summary.waterfall.gross_robux, Decimal::from(3000));
    assert_eq!(summary.waterfall.marketplace_cut, Decimal::from(900));
    assert_eq!(summary.waterfall.profit_usd, Decimal::from_str("5.35")?);

    let single_month = summarize(&transactions[..1], 10);
    assert_eq!(single_month.month_over_month, Decimal::ZERO);

    Ok(())
}

#[test]
fn test_weekly_report_compares_adjacent_weeks_and_skips_demo_rows() -> Result<()> {
    let today = date(2024, 6, 14)?;
    let transactions = vec![
        create_transaction("VIP", date(2024, 6, 14)?, 2000, "1", "0.0035")?,
        create_transaction("VIP", date(2024, 6, 8)?, 1000, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 6, 7)?, 2000, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 5, 31)?, 9000, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 6, 10)?, 5000, "0", "0.0035")?.into_demo(Utc::now())
    ];

    let report = weekly_report(&transactions, today);

    assert_eq!(report.week_start, date(2024, 6, 8)?);
    assert_eq!(report.week_end, today);
    assert!(report.has_activity);
    assert_eq!(report.gross_robux, Decimal::from(3000));
    assert_eq!(report.ad_spend, Decimal::from(1));
    assert_eq!(report.net_usd, Decimal::from_str("7.35")?);
    assert_eq!(report.previous_net_usd, Decimal::from_str("4.9")?);
    assert_eq!(report.week_over_week_change, Decimal::from(50));

    Ok(())
}

#[test]
fn test_weekly_report_without_activity() -> Result<()> {
    let report = weekly_report(&[], date(2024, 6, 14)?);

    assert!(!report.has_activity);
    assert_eq!(report.week_over_week_change, Decimal::ZERO);

    Ok(())
}

#[test]
fn test_rollups_survive_totals_beyond_decimal_range() -> Result<()> {
    let huge = Decimal::from_str("50000000000000000000000000000")?;
    let mut transactions = vec![
        create_transaction("VIP", date(2024, 6, 10)?, 1, "0", "0.0035")?,
        create_transaction("VIP", date(2024, 6, 11)?, 1, "0", "0.0035")?
    ];

    for transaction in transactions.iter_mut() {
        transaction.gross_robux = huge;
        transaction.ad_spend = Decimal::from_str("0.01")?;
    }

    let months = monthly_rollup(&transactions);

    assert_eq!(months.len(), 1);
    assert_eq!(months[0].totals.transactions, 2);
    assert_eq!(months[0].totals.gross_robux, huge);

    let summary = summarize(&transactions, 10);
    let report = weekly_report(&transactions, date(2024, 6, 14)?);

    assert_eq!(summary.totals.gross_robux, huge);
    assert_eq!(report.gross_robux, huge);
    assert_eq!(roi(Decimal::MAX, Decimal::from_str("0.01")?), Decimal::MAX);
    assert_eq!(trend(Decimal::MAX, Decimal::from_str("0.5")?), Decimal::MAX);

    Ok(())
}
