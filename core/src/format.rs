//! Presentation-boundary formatting.
//!
//! Core outputs stay numeric. Display strings are produced on fresh
//! `DisplayRow`s; the source rows are only borrowed.

use crate::{aggregate::GroupPerformance, record::JoinedDailyRecord};
use serde::{Deserialize, Serialize};

pub const UNDEFINED_DISPLAY: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// `$12,345`
    Currency,
    /// `3.20%` (the value is already percent-scaled)
    Percentage,
    /// `1.80x`
    Multiplier,
}

/// Field name → display kind. Fields not listed render plainly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatSpec {
    fields: Vec<(String, FormatKind)>,
}

impl FormatSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, kind: FormatKind) -> Self {
        let name = name.into();
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, kind));
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<FormatKind> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, kind)| *kind)
    }

    /// Channel / tactic tables.
    pub fn group_table() -> Self {
        Self::new()
            .field("spend", FormatKind::Currency)
            .field("attributed_revenue", FormatKind::Currency)
            .field("roas", FormatKind::Multiplier)
            .field("ctr", FormatKind::Percentage)
            .field("cpc", FormatKind::Currency)
    }

    /// Top / bottom campaign lists.
    pub fn campaign_table() -> Self {
        Self::new()
            .field("spend", FormatKind::Currency)
            .field("attributed_revenue", FormatKind::Currency)
            .field("roas", FormatKind::Multiplier)
    }
}

/// A single typed cell as exposed by a `Tabular` row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(u64),
    /// `None` is an undefined ratio.
    Number(Option<f64>),
}

/// Rows that can be rendered as a table.
pub trait Tabular {
    fn cells(&self) -> Vec<(&'static str, Cell)>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub cells: Vec<(String, String)>,
}

impl DisplayRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{:.0}", rounded.abs())))
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

pub fn format_value(kind: FormatKind, value: Option<f64>) -> String {
    let Some(v) = value else {
        return UNDEFINED_DISPLAY.to_string();
    };
    match kind {
        FormatKind::Currency => format_currency(v),
        FormatKind::Percentage => format!("{v:.2}%"),
        FormatKind::Multiplier => format!("{v:.2}x"),
    }
}

fn render_cell(cell: Cell, kind: Option<FormatKind>) -> String {
    match (cell, kind) {
        (Cell::Text(text), _) => text,
        (Cell::Count(n), Some(kind)) => format_value(kind, Some(n as f64)),
        (Cell::Count(n), None) => format_count(n),
        (Cell::Number(v), Some(kind)) => format_value(kind, v),
        (Cell::Number(Some(v)), None) => format!("{v:.2}"),
        (Cell::Number(None), None) => UNDEFINED_DISPLAY.to_string(),
    }
}

pub fn format_row<T: Tabular>(row: &T, spec: &FormatSpec) -> DisplayRow {
    DisplayRow {
        cells: row
            .cells()
            .into_iter()
            .map(|(name, cell)| (name.to_string(), render_cell(cell, spec.kind_of(name))))
            .collect(),
    }
}

pub fn format_rows<T: Tabular>(rows: &[T], spec: &FormatSpec) -> Vec<DisplayRow> {
    rows.iter().map(|row| format_row(row, spec)).collect()
}

impl Tabular for GroupPerformance {
    fn cells(&self) -> Vec<(&'static str, Cell)> {
        let mut cells = vec![("channel", Cell::Text(self.key.channel.clone()))];
        if let Some(campaign) = self.campaign() {
            cells.push(("campaign", Cell::Text(campaign.to_string())));
        }
        if let Some(tactic) = self.tactic() {
            cells.push(("tactic", Cell::Text(tactic.to_string())));
        }
        cells.extend([
            ("spend", Cell::Number(Some(self.spend))),
            ("attributed_revenue", Cell::Number(Some(self.attributed_revenue))),
            ("clicks", Cell::Count(self.clicks)),
            ("impressions", Cell::Count(self.impressions)),
            ("roas", Cell::Number(self.roas)),
            ("ctr", Cell::Number(self.ctr)),
            ("cpc", Cell::Number(self.cpc)),
        ]);
        cells
    }
}

impl Tabular for JoinedDailyRecord {
    fn cells(&self) -> Vec<(&'static str, Cell)> {
        vec![
            ("date", Cell::Text(self.date.to_string())),
            ("order_count", Cell::Count(self.order_count)),
            ("new_customers", Cell::Count(self.new_customers)),
            ("new_order_count", Cell::Count(self.new_order_count)),
            ("total_revenue", Cell::Number(Some(self.total_revenue))),
            ("gross_profit", Cell::Number(Some(self.gross_profit))),
            ("cogs", Cell::Number(Some(self.cogs))),
            ("spend", Cell::Number(Some(self.spend))),
            ("clicks", Cell::Count(self.clicks)),
            ("impressions", Cell::Count(self.impressions)),
            ("attributed_revenue", Cell::Number(Some(self.attributed_revenue))),
            ("marketing_roas", Cell::Number(self.marketing_roas)),
            ("ctr", Cell::Number(self.ctr)),
            ("cpc", Cell::Number(self.cpc)),
            ("gross_margin", Cell::Number(self.gross_margin)),
            ("aov", Cell::Number(self.aov)),
            ("new_customer_rate", Cell::Number(self.new_customer_rate)),
        ]
    }
}
