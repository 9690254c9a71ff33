//! Ranker — orders aggregated groups by one metric for top/bottom-N views.

use crate::aggregate::GroupPerformance;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankField {
    Roas,
    Ctr,
    Cpc,
    Spend,
    AttributedRevenue,
    Clicks,
    Impressions,
}

impl RankField {
    /// `None` for an undefined ratio.
    pub fn value(&self, group: &GroupPerformance) -> Option<f64> {
        match self {
            Self::Roas => group.roas,
            Self::Ctr => group.ctr,
            Self::Cpc => group.cpc,
            Self::Spend => Some(group.spend),
            Self::AttributedRevenue => Some(group.attributed_revenue),
            Self::Clicks => Some(group.clicks as f64),
            Self::Impressions => Some(group.impressions as f64),
        }
    }
}

impl FromStr for RankField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roas" => Ok(Self::Roas),
            "ctr" => Ok(Self::Ctr),
            "cpc" => Ok(Self::Cpc),
            "spend" => Ok(Self::Spend),
            "attributed_revenue" | "revenue" => Ok(Self::AttributedRevenue),
            "clicks" => Ok(Self::Clicks),
            "impressions" => Ok(Self::Impressions),
            other => anyhow::bail!("Unknown rank field '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Descending,
    Ascending,
}

/// Undefined compares below every defined value.
fn compare_lowest_undefined(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// A fully ranked group sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub field: RankField,
    pub direction: Direction,
    pub ordered: Vec<GroupPerformance>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// First `n` entries of the ranked order.
    pub fn top(&self, n: usize) -> &[GroupPerformance] {
        &self.ordered[..n.min(self.ordered.len())]
    }

    /// Last `n` entries of the ranked order, last-ranked first.
    pub fn bottom(&self, n: usize) -> Vec<GroupPerformance> {
        self.ordered.iter().rev().take(n).cloned().collect()
    }
}

/// Stable sort by `field`. Ties keep their input order.
pub fn rank(groups: &[GroupPerformance], field: RankField, direction: Direction) -> Ranking {
    let mut ordered = groups.to_vec();
    ordered.sort_by(|a, b| {
        let ord = compare_lowest_undefined(field.value(a), field.value(b));
        match direction {
            Direction::Descending => ord.reverse(),
            Direction::Ascending => ord,
        }
    });
    Ranking {
        field,
        direction,
        ordered,
    }
}
