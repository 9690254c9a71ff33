//! Input and derived row types.

use crate::{
    ratio::safe_ratio,
    types::{ChannelName, Currency, Ratio},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row per calendar date of business results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub order_count: u64,
    pub new_customers: u64,
    pub new_order_count: u64,
    pub total_revenue: Currency,
    pub gross_profit: Currency,
    pub cogs: Currency,
}

/// One row per (date, channel, campaign, tactic) of marketing activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub channel: ChannelName,
    pub campaign: String,
    pub tactic: String,
    pub spend: Currency,
    pub clicks: u64,
    pub impressions: u64,
    pub attributed_revenue: Currency,
}

/// Raw marketing metrics summed over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub spend: Currency,
    pub clicks: u64,
    pub impressions: u64,
    pub attributed_revenue: Currency,
}

/// Marketing activity summed over every record sharing a date.
pub type MarketingDailyTotal = MetricTotals;

impl MetricTotals {
    pub fn add(&mut self, record: &MarketingRecord) {
        self.spend += record.spend;
        self.clicks = self.clicks.saturating_add(record.clicks);
        self.impressions = self.impressions.saturating_add(record.impressions);
        self.attributed_revenue += record.attributed_revenue;
    }
}

/// A business day joined with that day's marketing totals and derived KPIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedDailyRecord {
    pub date: NaiveDate,
    pub order_count: u64,
    pub new_customers: u64,
    pub new_order_count: u64,
    pub total_revenue: Currency,
    pub gross_profit: Currency,
    pub cogs: Currency,
    // Same-date marketing totals (zero on days without activity)
    pub spend: Currency,
    pub clicks: u64,
    pub impressions: u64,
    pub attributed_revenue: Currency,
    // Derived
    pub marketing_roas: Ratio,
    /// Fraction of impressions clicked (not percent-scaled).
    pub ctr: Ratio,
    pub cpc: Ratio,
    pub gross_margin: Ratio,
    pub aov: Ratio,
    pub new_customer_rate: Ratio,
}

impl JoinedDailyRecord {
    pub fn derive(business: &BusinessRecord, marketing: MarketingDailyTotal) -> Self {
        let orders = business.order_count as f64;
        Self {
            date: business.date,
            order_count: business.order_count,
            new_customers: business.new_customers,
            new_order_count: business.new_order_count,
            total_revenue: business.total_revenue,
            gross_profit: business.gross_profit,
            cogs: business.cogs,
            spend: marketing.spend,
            clicks: marketing.clicks,
            impressions: marketing.impressions,
            attributed_revenue: marketing.attributed_revenue,
            marketing_roas: safe_ratio(marketing.attributed_revenue, marketing.spend),
            ctr: safe_ratio(marketing.clicks as f64, marketing.impressions as f64),
            cpc: safe_ratio(marketing.spend, marketing.clicks as f64),
            gross_margin: safe_ratio(business.gross_profit, business.total_revenue),
            aov: safe_ratio(business.total_revenue, orders),
            new_customer_rate: safe_ratio(business.new_customers as f64, orders),
        }
    }
}
