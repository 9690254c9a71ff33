//! Schema validation: untyped tables in, typed records out.
//!
//! The loader hands over header + string cells. Headers are normalized
//! (trim, configured aliases, snake_case) and every expected column must
//! be present; a missing one is a schema mismatch and fails the call.

use crate::{
    config::ColumnMappings,
    error::{MetricsError, MetricsResult},
    record::{BusinessRecord, MarketingRecord},
};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const BUSINESS_COLUMNS: [&str; 7] = [
    "date",
    "order_count",
    "new_customers",
    "new_order_count",
    "total_revenue",
    "gross_profit",
    "cogs",
];

pub const MARKETING_COLUMNS: [&str; 7] = [
    "date",
    "campaign",
    "tactic",
    "spend",
    "clicks",
    "impressions",
    "attributed_revenue",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A named table of string cells as produced by a loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Map a raw header to its canonical column name.
pub fn normalize_header(raw: &str, aliases: &HashMap<String, String>) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    if let Some(canonical) = aliases
        .iter()
        .find(|(alias, _)| alias.trim().to_lowercase() == lowered)
        .map(|(_, canonical)| canonical)
    {
        return canonical.clone();
    }
    lowered.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Resolved column positions for one table.
struct ColumnIndex<'a> {
    table: &'a RawTable,
    positions: HashMap<String, usize>,
}

impl<'a> ColumnIndex<'a> {
    fn build(table: &'a RawTable, aliases: &HashMap<String, String>) -> Self {
        let mut positions = HashMap::new();
        for (i, header) in table.headers.iter().enumerate() {
            // First occurrence wins when two headers normalize alike.
            positions.entry(normalize_header(header, aliases)).or_insert(i);
        }
        Self { table, positions }
    }

    fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    fn require(&self, columns: &[&str]) -> MetricsResult<()> {
        match columns.iter().find(|c| !self.has(c)) {
            Some(missing) => Err(MetricsError::MissingColumn {
                table: self.table.name.clone(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn cell<'r>(&self, row: &'r [String], column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn invalid(&self, row: usize, column: &str, value: &str) -> MetricsError {
        MetricsError::InvalidValue {
            table: self.table.name.clone(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn date(&self, row_no: usize, row: &[String], column: &str) -> MetricsResult<NaiveDate> {
        let raw = self.cell(row, column);
        parse_date(raw).ok_or_else(|| self.invalid(row_no, column, raw))
    }

    fn amount(&self, row_no: usize, row: &[String], column: &str) -> MetricsResult<f64> {
        let raw = self.cell(row, column);
        parse_amount(raw).ok_or_else(|| self.invalid(row_no, column, raw))
    }

    /// Amounts that can never be negative (spend, attributed revenue).
    fn non_negative(&self, row_no: usize, row: &[String], column: &str) -> MetricsResult<f64> {
        let raw = self.cell(row, column);
        parse_amount(raw)
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| self.invalid(row_no, column, raw))
    }

    fn count(&self, row_no: usize, row: &[String], column: &str) -> MetricsResult<u64> {
        let raw = self.cell(row, column);
        parse_amount(raw)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u64)
            .ok_or_else(|| self.invalid(row_no, column, raw))
    }
}

/// Accepts ISO dates, US-style dates and ISO timestamps (time part dropped).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parses a numeric cell. Currency symbols and thousands separators are
/// ignored; an empty cell is zero.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_business(
    table: &RawTable,
    mappings: &ColumnMappings,
) -> MetricsResult<Vec<BusinessRecord>> {
    let cols = ColumnIndex::build(table, &mappings.business);
    cols.require(&BUSINESS_COLUMNS)?;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> MetricsResult<BusinessRecord> {
            let row_no = i + 1;
            Ok(BusinessRecord {
                date: cols.date(row_no, row, "date")?,
                order_count: cols.count(row_no, row, "order_count")?,
                new_customers: cols.count(row_no, row, "new_customers")?,
                new_order_count: cols.count(row_no, row, "new_order_count")?,
                total_revenue: cols.amount(row_no, row, "total_revenue")?,
                gross_profit: cols.amount(row_no, row, "gross_profit")?,
                cogs: cols.amount(row_no, row, "cogs")?,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    log::debug!("schema: parsed {} business rows from '{}'", records.len(), table.name);
    Ok(records)
}

/// Parse a marketing table. `channel` tags every row (one file per channel);
/// without it the table must carry its own `channel` column.
pub fn parse_marketing(
    table: &RawTable,
    channel: Option<&str>,
    mappings: &ColumnMappings,
) -> MetricsResult<Vec<MarketingRecord>> {
    let cols = ColumnIndex::build(table, &mappings.marketing);
    cols.require(&MARKETING_COLUMNS)?;
    if channel.is_none() {
        cols.require(&["channel"])?;
    }

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> MetricsResult<MarketingRecord> {
            let row_no = i + 1;
            let channel = match channel {
                Some(name) => name.to_string(),
                None => cols.cell(row, "channel").to_string(),
            };
            Ok(MarketingRecord {
                date: cols.date(row_no, row, "date")?,
                channel,
                campaign: cols.cell(row, "campaign").to_string(),
                tactic: cols.cell(row, "tactic").to_string(),
                spend: cols.non_negative(row_no, row, "spend")?,
                clicks: cols.count(row_no, row, "clicks")?,
                impressions: cols.count(row_no, row, "impressions")?,
                attributed_revenue: cols.non_negative(row_no, row, "attributed_revenue")?,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    log::debug!(
        "schema: parsed {} marketing rows from '{}'",
        records.len(),
        table.name
    );
    Ok(records)
}
