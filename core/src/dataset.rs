//! The validated input pair handed to the pipeline.

use crate::{
    config::ColumnMappings,
    error::MetricsResult,
    record::{BusinessRecord, MarketingRecord},
    schema::{parse_business, parse_marketing, RawTable},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub business: Vec<BusinessRecord>,
    pub marketing: Vec<MarketingRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Shape of the loaded data, independent of any filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataInfo {
    pub business_records: usize,
    pub marketing_records: usize,
    /// Across both tables; `None` when both are empty.
    pub date_range: Option<DateRange>,
    pub channels: Vec<String>,
    /// Distinct tactics per channel.
    pub tactics: BTreeMap<String, usize>,
}

impl Dataset {
    pub fn new(business: Vec<BusinessRecord>, marketing: Vec<MarketingRecord>) -> Self {
        Self {
            business,
            marketing,
        }
    }

    /// Validate the business table and one table per marketing channel.
    pub fn from_tables(
        business: &RawTable,
        marketing: &[(String, RawTable)],
        mappings: &ColumnMappings,
    ) -> MetricsResult<Self> {
        let business = parse_business(business, mappings)?;
        let mut records = Vec::new();
        for (channel, table) in marketing {
            records.extend(parse_marketing(table, Some(channel), mappings)?);
        }
        Ok(Self::new(business, records))
    }

    /// Sorted distinct channel names present in the marketing data.
    pub fn channels(&self) -> Vec<String> {
        self.marketing
            .iter()
            .map(|m| m.channel.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn earliest_business_date(&self) -> Option<NaiveDate> {
        self.business.iter().map(|b| b.date).min()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.business
            .iter()
            .map(|b| b.date)
            .chain(self.marketing.iter().map(|m| m.date))
            .max()
    }

    pub fn info(&self) -> DataInfo {
        let dates = self
            .business
            .iter()
            .map(|b| b.date)
            .chain(self.marketing.iter().map(|m| m.date));
        let date_range = dates.fold(None::<DateRange>, |range, d| match range {
            None => Some(DateRange { start: d, end: d }),
            Some(r) => Some(DateRange {
                start: r.start.min(d),
                end: r.end.max(d),
            }),
        });

        let mut tactics: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        for m in &self.marketing {
            tactics.entry(m.channel.clone()).or_default().insert(m.tactic.as_str());
        }

        DataInfo {
            business_records: self.business.len(),
            marketing_records: self.marketing.len(),
            date_range,
            channels: self.channels(),
            tactics: tactics.into_iter().map(|(c, t)| (c, t.len())).collect(),
        }
    }
}
