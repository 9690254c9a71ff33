//! Filter surface consumed by the pipeline: an inclusive lower date bound
//! and an exact-match channel selection.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "name")]
pub enum ChannelFilter {
    #[default]
    All,
    Only(String),
}

impl ChannelFilter {
    pub fn matches(&self, channel: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == channel,
        }
    }
}

impl FromStr for ChannelFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ChannelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Only(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsFilter {
    /// Inclusive lower bound; `None` keeps every date.
    pub min_date: Option<NaiveDate>,
    pub channel: ChannelFilter,
}

impl MetricsFilter {
    pub fn all_time() -> Self {
        Self::default()
    }

    /// Filter for a preset window ending at `anchor`.
    pub fn for_period(period: TimePeriod, anchor: NaiveDate, channel: ChannelFilter) -> Self {
        Self {
            min_date: period.min_date(anchor),
            channel,
        }
    }

    pub fn since(mut self, min_date: NaiveDate) -> Self {
        self.min_date = Some(min_date);
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = ChannelFilter::Only(channel.into());
        self
    }

    pub fn keeps_date(&self, date: NaiveDate) -> bool {
        self.min_date.is_none_or(|min| date >= min)
    }
}

/// Preset reporting windows offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_90_days")]
    Last90Days,
    #[serde(rename = "all_time")]
    AllTime,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::Last7Days,
        TimePeriod::Last30Days,
        TimePeriod::Last90Days,
        TimePeriod::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 Days",
            Self::Last30Days => "Last 30 Days",
            Self::Last90Days => "Last 90 Days",
            Self::AllTime => "All Time",
        }
    }

    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::AllTime => None,
        }
    }

    /// Lower bound for a window of `days` calendar days ending at `anchor`
    /// (inclusive on both ends). `AllTime` has no bound.
    pub fn min_date(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|d| anchor - Duration::days(d - 1))
    }
}

impl FromStr for TimePeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "7" | "last-7" | "last-7-days" => Ok(Self::Last7Days),
            "30" | "last-30" | "last-30-days" => Ok(Self::Last30Days),
            "90" | "last-90" | "last-90-days" => Ok(Self::Last90Days),
            "all" | "all-time" => Ok(Self::AllTime),
            _ => anyhow::bail!(
                "Unknown time period '{s}' (expected last-7, last-30, last-90 or all)"
            ),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
