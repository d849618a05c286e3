mod aggregator;
mod report;
#[cfg(test)]
mod tests;

pub use aggregator::{monthly_rollup, roi, summarize, top_items, totals, trend, DashboardSummary, ItemPerformance, MetricTotals, MonthlyMetrics, Waterfall};
pub use report::{weekly_report, WeeklyReport};
