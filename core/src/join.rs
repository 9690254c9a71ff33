//! Join & Derive — merges per-date marketing totals into the business
//! table and computes the per-day KPIs.
//!
//! Steps:
//!   1. Filter both record sets by `min_date`; filter marketing by channel.
//!   2. Sum marketing per date.
//!   3. Left-join business on date (days without marketing get zeros).
//!   4. Derive ratios through `safe_ratio`.

use crate::{
    error::{MetricsError, MetricsResult},
    filter::MetricsFilter,
    record::{BusinessRecord, JoinedDailyRecord, MarketingDailyTotal, MarketingRecord},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output of the join: the daily table plus the filtered marketing rows
/// that downstream grouping needs at row granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedTables {
    /// Ascending by date, one entry per business date kept by the filter.
    pub daily: Vec<JoinedDailyRecord>,
    pub marketing: Vec<MarketingRecord>,
}

/// Marketing rows kept by the filter, in input order.
pub fn filter_marketing(
    marketing: &[MarketingRecord],
    filter: &MetricsFilter,
) -> Vec<MarketingRecord> {
    marketing
        .iter()
        .filter(|m| filter.keeps_date(m.date) && filter.channel.matches(&m.channel))
        .cloned()
        .collect()
}

/// Sum spend, clicks, impressions and attributed revenue per date.
pub fn daily_marketing_totals(
    marketing: &[MarketingRecord],
) -> BTreeMap<NaiveDate, MarketingDailyTotal> {
    let mut totals: BTreeMap<NaiveDate, MarketingDailyTotal> = BTreeMap::new();
    for record in marketing {
        totals.entry(record.date).or_default().add(record);
    }
    totals
}

pub fn join_and_derive(
    business: &[BusinessRecord],
    marketing: &[MarketingRecord],
    filter: &MetricsFilter,
) -> MetricsResult<JoinedTables> {
    let filtered_marketing = filter_marketing(marketing, filter);
    let totals = daily_marketing_totals(&filtered_marketing);

    let mut by_date: BTreeMap<NaiveDate, &BusinessRecord> = BTreeMap::new();
    for record in business.iter().filter(|b| filter.keeps_date(b.date)) {
        if by_date.insert(record.date, record).is_some() {
            return Err(MetricsError::DuplicateDate { date: record.date });
        }
    }

    let daily: Vec<JoinedDailyRecord> = by_date
        .into_values()
        .map(|b| {
            let day_totals = totals.get(&b.date).copied().unwrap_or_default();
            JoinedDailyRecord::derive(b, day_totals)
        })
        .collect();

    let unmatched = totals
        .keys()
        .filter(|d| daily.binary_search_by_key(*d, |r| r.date).is_err())
        .count();
    if unmatched > 0 {
        log::debug!("join: {unmatched} marketing dates have no business record and were dropped");
    }
    if filtered_marketing.is_empty() && !daily.is_empty() {
        log::warn!("join: no marketing activity left after filter ({})", filter.channel);
    }
    log::debug!(
        "join: {} business days, {} marketing rows, {} days with activity",
        daily.len(),
        filtered_marketing.len(),
        totals.len()
    );

    Ok(JoinedTables {
        daily,
        marketing: filtered_marketing,
    })
}
