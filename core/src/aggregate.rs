//! Channel / campaign / tactic aggregation.
//!
//! One generic operation: group marketing rows by a key tuple, sum the raw
//! metrics, then map each group's totals to derived ratios.

use crate::{
    ratio::safe_ratio,
    record::{MarketingRecord, MetricTotals},
    types::{ChannelName, Currency, Ratio},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Channel,
    ChannelCampaign,
    ChannelTactic,
}

impl GroupBy {
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Channel => &["channel"],
            Self::ChannelCampaign => &["channel", "campaign"],
            Self::ChannelTactic => &["channel", "tactic"],
        }
    }

    pub fn key_of(&self, record: &MarketingRecord) -> GroupKey {
        let secondary = match self {
            Self::Channel => None,
            Self::ChannelCampaign => Some(record.campaign.clone()),
            Self::ChannelTactic => Some(record.tactic.clone()),
        };
        GroupKey {
            channel: record.channel.clone(),
            secondary,
        }
    }
}

/// Channel plus the optional campaign or tactic label, depending on `GroupBy`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub channel: ChannelName,
    pub secondary: Option<String>,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(label) => write!(f, "{} / {}", self.channel, label),
            None => write!(f, "{}", self.channel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPerformance {
    pub group_by: GroupBy,
    pub key: GroupKey,
    pub spend: Currency,
    pub attributed_revenue: Currency,
    pub clicks: u64,
    pub impressions: u64,
    pub roas: Ratio,
    /// Percent of impressions clicked.
    pub ctr: Ratio,
    pub cpc: Ratio,
}

impl GroupPerformance {
    pub fn from_totals(group_by: GroupBy, key: GroupKey, totals: MetricTotals) -> Self {
        Self {
            group_by,
            key,
            spend: totals.spend,
            attributed_revenue: totals.attributed_revenue,
            clicks: totals.clicks,
            impressions: totals.impressions,
            roas: safe_ratio(totals.attributed_revenue, totals.spend),
            ctr: safe_ratio(totals.clicks as f64, totals.impressions as f64).map(|r| r * 100.0),
            cpc: safe_ratio(totals.spend, totals.clicks as f64),
        }
    }

    pub fn channel(&self) -> &str {
        &self.key.channel
    }

    pub fn campaign(&self) -> Option<&str> {
        match self.group_by {
            GroupBy::ChannelCampaign => self.key.secondary.as_deref(),
            _ => None,
        }
    }

    pub fn tactic(&self) -> Option<&str> {
        match self.group_by {
            GroupBy::ChannelTactic => self.key.secondary.as_deref(),
            _ => None,
        }
    }
}

/// Group by an arbitrary key and sum the raw metrics of each group.
pub fn group_reduce<K, F>(records: &[MarketingRecord], key_fn: F) -> BTreeMap<K, MetricTotals>
where
    K: Ord,
    F: Fn(&MarketingRecord) -> K,
{
    let mut groups: BTreeMap<K, MetricTotals> = BTreeMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().add(record);
    }
    groups
}

/// One row per distinct key tuple. Rows come out in key order; callers that
/// care about ordering go through the ranker.
pub fn aggregate(records: &[MarketingRecord], group_by: GroupBy) -> Vec<GroupPerformance> {
    let groups = group_reduce(records, |r| group_by.key_of(r));
    log::debug!(
        "aggregate: {} rows into {} groups by {:?}",
        records.len(),
        groups.len(),
        group_by.key_columns()
    );
    groups
        .into_iter()
        .map(|(key, totals)| GroupPerformance::from_totals(group_by, key, totals))
        .collect()
}

pub fn channel_performance(records: &[MarketingRecord]) -> Vec<GroupPerformance> {
    aggregate(records, GroupBy::Channel)
}

pub fn campaign_performance(records: &[MarketingRecord]) -> Vec<GroupPerformance> {
    aggregate(records, GroupBy::ChannelCampaign)
}

pub fn tactic_performance(records: &[MarketingRecord]) -> Vec<GroupPerformance> {
    aggregate(records, GroupBy::ChannelTactic)
}
