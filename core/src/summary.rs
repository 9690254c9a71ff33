//! Executive summary — headline scalars for one filter context.
//!
//! Headline ratios always render a number: an undefined ratio falls back
//! to zero here, unlike everywhere else in the crate.

use crate::{
    ratio::{mean, or_zero, safe_ratio},
    record::JoinedDailyRecord,
    types::Currency,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub total_revenue: Currency,
    pub total_spend: Currency,
    pub overall_roas: f64,
    pub avg_aov: Currency,
    pub gross_margin_pct: f64,
    pub revenue_growth_pct: f64,
    pub total_orders: u64,
    pub total_customers: u64,
}

/// Income and cost totals for the revenue / cost breakdown view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub revenue: Currency,
    pub cogs: Currency,
    pub marketing_spend: Currency,
    pub gross_profit: Currency,
}

pub fn executive_summary(daily: &[JoinedDailyRecord]) -> ExecutiveSummary {
    let total_revenue: f64 = daily.iter().map(|d| d.total_revenue).sum();
    let total_spend: f64 = daily.iter().map(|d| d.spend).sum();
    let total_attributed: f64 = daily.iter().map(|d| d.attributed_revenue).sum();
    let total_profit: f64 = daily.iter().map(|d| d.gross_profit).sum();
    let total_orders: u64 = daily.iter().map(|d| d.order_count).sum();
    let total_customers: u64 = daily.iter().map(|d| d.new_customers).sum();

    ExecutiveSummary {
        total_revenue,
        total_spend,
        overall_roas: or_zero(safe_ratio(total_attributed, total_spend)),
        avg_aov: or_zero(safe_ratio(total_revenue, total_orders as f64)),
        gross_margin_pct: 100.0 * or_zero(safe_ratio(total_profit, total_revenue)),
        revenue_growth_pct: revenue_growth_pct(daily),
        total_orders,
        total_customers,
    }
}

/// Mean revenue of the later half against the earlier half, in percent.
/// The split is at `len / 2`, so an odd record lands in the later half.
pub fn revenue_growth_pct(daily: &[JoinedDailyRecord]) -> f64 {
    if daily.len() < 2 {
        return 0.0;
    }
    let (earlier, later) = split_halves(daily);
    let earlier_mean = mean(earlier.iter().map(|d| Some(d.total_revenue)));
    let later_mean = mean(later.iter().map(|d| Some(d.total_revenue)));
    match (earlier_mean, later_mean) {
        (Some(e), Some(l)) if e > 0.0 => or_zero(safe_ratio(l - e, e)) * 100.0,
        _ => 0.0,
    }
}

/// Earlier and later halves of an ordered sequence; the later half takes
/// the extra record when the length is odd.
pub fn split_halves<T>(records: &[T]) -> (&[T], &[T]) {
    records.split_at(records.len() / 2)
}

pub fn cost_breakdown(daily: &[JoinedDailyRecord]) -> CostBreakdown {
    daily.iter().fold(CostBreakdown::default(), |mut acc, d| {
        acc.revenue += d.total_revenue;
        acc.cogs += d.cogs;
        acc.marketing_spend += d.spend;
        acc.gross_profit += d.gross_profit;
        acc
    })
}
