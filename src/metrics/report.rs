use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::metrics::{trend, MetricTotals};
use crate::models::Transaction;

const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub net_usd: Decimal,
    pub gross_robux: Decimal,
    pub ad_spend: Decimal,
    pub previous_net_usd: Decimal,
    pub week_over_week_change: Decimal,
    pub has_activity: bool
}

/// Compares the seven days ending `today` with the seven days before them. Demo data is ignored.
pub fn weekly_report(transactions: &[Transaction], today: NaiveDate) -> WeeklyReport {
    let week_start = today - Days::new(WEEK_DAYS - 1);
    let previous_start = week_start - Days::new(WEEK_DAYS);

    let real = || transactions.iter().filter(|transaction| !transaction.demo_data);

    let current: MetricTotals = real()
        .filter(|transaction| (week_start..=today).contains(&transaction.transaction_date))
        .collect();
    let previous: MetricTotals = real()
        .filter(|transaction| (previous_start..week_start).contains(&transaction.transaction_date))
        .collect();

    WeeklyReport {
        week_start,
        week_end: today,
        net_usd: current.net_usd,
        gross_robux: current.gross_robux,
        ad_spend: current.ad_spend,
        previous_net_usd: previous.net_usd,
        week_over_week_change: trend(current.net_usd, previous.net_usd),
        has_activity: current.transactions > 0
    }
}
