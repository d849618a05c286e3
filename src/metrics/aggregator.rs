use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use tracing::error;

use crate::models::{ItemType, Transaction};

const PERCENT: u32 = 100;

/// `(net_usd - ad_spend) / ad_spend * 100`, or zero when nothing was spent.
pub fn roi(net_usd: Decimal, ad_spend: Decimal) -> Decimal {
    if ad_spend <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    percent_change(net_usd, ad_spend)
}

/// Percentage change from `previous` to `current`, or zero when there is no baseline.
pub fn trend(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }

    percent_change(current, previous)
}

//NOTE: Saturates instead of panicking, a tiny baseline can push the ratio past `Decimal::MAX`.
fn percent_change(current: Decimal, baseline: Decimal) -> Decimal {
    current.checked_sub(baseline)
        .and_then(|delta| delta.checked_div(baseline))
        .and_then(|ratio| ratio.checked_mul(Decimal::from(PERCENT)))
        .unwrap_or_else(|| {
            error!("Percentage change from {baseline} to {current} overflows");

            if (current > baseline) == baseline.is_sign_positive() { Decimal::MAX } else { Decimal::MIN }
        })
}

fn accumulate(total: &mut Decimal, amount: Decimal, figure: &str) {
    match total.checked_add(amount) {
        Some(sum) => *total = sum,
        None => error!("Sum of {figure} overflows, keeping {total}")
    }
}

/// Sums over a group of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricTotals {
    pub transactions: usize,
    pub gross_robux: Decimal,
    pub marketplace_cut: Decimal,
    pub ad_spend: Decimal,
    pub net_robux: Decimal,
    pub net_usd: Decimal,
    /// Plain mean of the per-row DevEx rates.
    pub avg_devex_rate: Decimal,
    #[serde(skip)]
    devex_rate_sum: Decimal
}

impl MetricTotals {
    fn add(&mut self, transaction: &Transaction) {
        self.transactions += 1;

        accumulate(&mut self.gross_robux, transaction.gross_robux, "gross Robux");
        accumulate(&mut self.marketplace_cut, transaction.marketplace_cut, "marketplace cut");
        accumulate(&mut self.ad_spend, transaction.ad_spend, "ad spend");
        accumulate(&mut self.net_robux, transaction.net_robux, "net Robux");
        accumulate(&mut self.net_usd, transaction.net_usd, "net USD");
        accumulate(&mut self.devex_rate_sum, transaction.devex_rate.value(), "DevEx rates");

        if let Some(average) = self.devex_rate_sum.checked_div(Decimal::from(self.transactions)) {
            self.avg_devex_rate = average;
        }
    }
}

impl<'a> FromIterator<&'a Transaction> for MetricTotals {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(transactions: I) -> Self {
        let mut totals = MetricTotals::default();

        for transaction in transactions {
            totals.add(transaction);
        }

        totals
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetrics {
    /// First day of the month.
    pub month: NaiveDate,
    #[serde(flatten)]
    pub totals: MetricTotals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPerformance {
    pub item_name: String,
    pub item_type: ItemType,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub roi: Decimal
}

/// Where gross revenue goes on its way to profit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Waterfall {
    pub gross_robux: Decimal,
    pub marketplace_cut: Decimal,
    pub net_robux: Decimal,
    pub net_usd: Decimal,
    pub ad_spend: Decimal,
    pub profit_usd: Decimal
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub totals: MetricTotals,
    pub roi: Decimal,
    pub month_over_month: Decimal,
    pub top_items: Vec<ItemPerformance>,
    pub waterfall: Waterfall
}

pub fn totals(transactions: &[Transaction]) -> MetricTotals {
    transactions.iter().collect()
}

/// Groups transactions by calendar month, oldest month first.
pub fn monthly_rollup(transactions: &[Transaction]) -> Vec<MonthlyMetrics> {
    let mut months: BTreeMap<NaiveDate, MetricTotals> = BTreeMap::new();

    for transaction in transactions {
        let date = transaction.transaction_date;
        let month = date.with_day(1).unwrap_or(date);

        months.entry(month).or_default().add(transaction);
    }

    months.into_iter()
        .map(|(month, totals)| MonthlyMetrics { month, totals })
        .collect()
}

/// The `n` best-earning items by net USD. Ties keep the order in which items first appeared.
pub fn top_items(transactions: &[Transaction], n: usize) -> Vec<ItemPerformance> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<ItemPerformance> = Vec::new();

    for transaction in transactions {
        let position = *positions.entry(transaction.item_name.as_str()).or_insert_with(|| {
            items.push(ItemPerformance {
                item_name: transaction.item_name.clone(),
                item_type: transaction.item_type,
                totals: MetricTotals::default(),
                roi: Decimal::ZERO
            });
            items.len() - 1
        });

        items[position].totals.add(transaction);
    }

    for item in items.iter_mut() {
        item.roi = roi(item.totals.net_usd, item.totals.ad_spend);
    }

    items.sort_by(|left, right| right.totals.net_usd.cmp(&left.totals.net_usd));
    items.truncate(n);
    items
}

pub fn summarize(transactions: &[Transaction], top_n: usize) -> DashboardSummary {
    let totals = totals(transactions);
    let months = monthly_rollup(transactions);

    let month_over_month = match months.as_slice() {
        [.., previous, current] => trend(current.totals.net_usd, previous.totals.net_usd),
        _ => Decimal::ZERO
    };

    let waterfall = Waterfall {
        gross_robux: totals.gross_robux,
        marketplace_cut: totals.marketplace_cut,
        net_robux: totals.net_robux,
        net_usd: totals.net_usd,
        ad_spend: totals.ad_spend,
        profit_usd: totals.net_usd.checked_sub(totals.ad_spend).unwrap_or(Decimal::MIN)
    };

    DashboardSummary {
        roi: roi(totals.net_usd, totals.ad_spend),
        month_over_month,
        top_items: top_items(transactions, top_n),
        waterfall,
        totals
    }
}
