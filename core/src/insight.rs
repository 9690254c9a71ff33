//! Insight deriver — descriptive signals on top of the joined and grouped
//! tables, plus the narrative items shown next to the dashboard.
//!
//! Narrative strings only restate numeric findings; every number they
//! quote is also exposed on `InsightFindings`.

use crate::{
    aggregate::{channel_performance, group_reduce},
    config::InsightConfig,
    ratio::{coefficient_of_variation, mean, or_zero, safe_ratio},
    record::{JoinedDailyRecord, MarketingRecord},
    summary::{split_halves, ExecutiveSummary},
    types::Ratio,
};
use chrono::{Datelike, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of records at each end of the table compared by the ROAS trend.
pub const ROAS_TREND_WINDOW: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvancedInsights {
    /// Sample stddev of daily revenue over its mean.
    pub revenue_volatility: Ratio,
    pub best_day_of_week: Option<String>,
    pub best_day_revenue: Ratio,
    pub roas_trend_pct: f64,
    /// Largest single-channel share of total spend.
    pub channel_concentration: f64,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn advanced_insights(
    daily: &[JoinedDailyRecord],
    marketing: &[MarketingRecord],
) -> AdvancedInsights {
    let best_day = best_day_of_week(daily);
    AdvancedInsights {
        revenue_volatility: coefficient_of_variation(daily.iter().map(|d| Some(d.total_revenue))),
        best_day_of_week: best_day.map(|(day, _)| weekday_name(day).to_string()),
        best_day_revenue: best_day.map(|(_, revenue)| revenue),
        roas_trend_pct: roas_trend_pct(daily),
        channel_concentration: channel_concentration(marketing),
    }
}

/// Weekday with the highest mean revenue. Ties go to the earlier weekday.
pub fn best_day_of_week(daily: &[JoinedDailyRecord]) -> Option<(Weekday, f64)> {
    let mut by_day: BTreeMap<u32, (Weekday, Vec<Ratio>)> = BTreeMap::new();
    for record in daily {
        let day = record.date.weekday();
        by_day
            .entry(day.num_days_from_monday())
            .or_insert_with(|| (day, Vec::new()))
            .1
            .push(Some(record.total_revenue));
    }

    let mut best: Option<(Weekday, f64)> = None;
    for (day, revenues) in by_day.into_values() {
        let Some(avg) = mean(revenues) else { continue };
        if best.is_none_or(|(_, top)| avg > top) {
            best = Some((day, avg));
        }
    }
    best
}

/// Percent change of mean ROAS from the first 7 records to the last 7.
/// Zero with 7 or fewer records, a non-positive baseline, or a window
/// without any defined ROAS.
pub fn roas_trend_pct(daily: &[JoinedDailyRecord]) -> f64 {
    if daily.len() <= ROAS_TREND_WINDOW {
        return 0.0;
    }
    let earlier = mean(daily[..ROAS_TREND_WINDOW].iter().map(|d| d.marketing_roas));
    let recent = mean(daily[daily.len() - ROAS_TREND_WINDOW..].iter().map(|d| d.marketing_roas));
    match (earlier, recent) {
        (Some(e), Some(r)) if e > 0.0 => or_zero(safe_ratio(r - e, e)) * 100.0,
        _ => 0.0,
    }
}

pub fn channel_concentration(marketing: &[MarketingRecord]) -> f64 {
    let spend_by_channel = group_reduce(marketing, |r| r.channel.clone());
    let total: f64 = spend_by_channel.values().map(|t| t.spend).sum();
    let largest = spend_by_channel
        .values()
        .map(|t| t.spend)
        .fold(0.0, f64::max);
    or_zero(safe_ratio(largest, total))
}

// ── Narrative ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCallout {
    pub channel: String,
    pub roas: f64,
}

/// Numbers behind the narrative items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightFindings {
    pub best_channel: ChannelCallout,
    pub worst_channel: ChannelCallout,
    pub high_aov_threshold: f64,
    pub high_aov_days: usize,
    pub high_aov_margin: Ratio,
    pub other_days_margin: Ratio,
    pub weekend_revenue: Ratio,
    pub weekday_revenue: Ratio,
    /// Spend per new customer in the earlier and later halves.
    pub cac_earlier: Ratio,
    pub cac_later: Ratio,
    pub cac_change_pct: Ratio,
    pub cac_rising: bool,
    /// Coefficient of variation of daily gross margin.
    pub margin_volatility: Ratio,
    pub margin_volatile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSection {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub findings: InsightFindings,
    pub opportunities: InsightSection,
    pub improvements: InsightSection,
}

fn spend_per_new_customer(days: &[JoinedDailyRecord]) -> Ratio {
    let spend: f64 = days.iter().map(|d| d.spend).sum();
    let customers: u64 = days.iter().map(|d| d.new_customers).sum();
    safe_ratio(spend, customers as f64)
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// `None` when no channel has a defined ROAS.
pub fn derive_findings(
    daily: &[JoinedDailyRecord],
    marketing: &[MarketingRecord],
    summary: &ExecutiveSummary,
    config: &InsightConfig,
) -> Option<InsightFindings> {
    let channels: Vec<ChannelCallout> = channel_performance(marketing)
        .into_iter()
        .filter_map(|g| {
            g.roas.map(|roas| ChannelCallout {
                channel: g.key.channel,
                roas,
            })
        })
        .collect();
    // First maximum / first minimum in channel order.
    let best = channels
        .iter()
        .fold(None::<&ChannelCallout>, |acc, c| match acc {
            Some(b) if b.roas >= c.roas => Some(b),
            _ => Some(c),
        })?
        .clone();
    let worst = channels
        .iter()
        .fold(None::<&ChannelCallout>, |acc, c| match acc {
            Some(w) if w.roas <= c.roas => Some(w),
            _ => Some(c),
        })?
        .clone();

    let high_aov_threshold = summary.avg_aov * config.high_aov_multiplier;
    let (high_days, other_days): (Vec<&JoinedDailyRecord>, Vec<&JoinedDailyRecord>) = daily
        .iter()
        .partition(|d| d.aov.is_some_and(|aov| aov > high_aov_threshold));

    let (weekend, weekday): (Vec<&JoinedDailyRecord>, Vec<&JoinedDailyRecord>) =
        daily.iter().partition(|d| is_weekend(d.date.weekday()));

    let (earlier, later) = split_halves(daily);
    let cac_earlier = spend_per_new_customer(earlier);
    let cac_later = spend_per_new_customer(later);
    let cac_change_pct = match (cac_earlier, cac_later) {
        (Some(e), Some(l)) => safe_ratio(l - e, e).map(|r| r * 100.0),
        _ => None,
    };

    let margin_volatility = coefficient_of_variation(daily.iter().map(|d| d.gross_margin));

    Some(InsightFindings {
        best_channel: best,
        worst_channel: worst,
        high_aov_threshold,
        high_aov_days: high_days.len(),
        high_aov_margin: mean(high_days.iter().map(|d| d.gross_margin)),
        other_days_margin: mean(other_days.iter().map(|d| d.gross_margin)),
        weekend_revenue: mean(weekend.iter().map(|d| Some(d.total_revenue))),
        weekday_revenue: mean(weekday.iter().map(|d| Some(d.total_revenue))),
        cac_earlier,
        cac_later,
        cac_change_pct,
        cac_rising: cac_change_pct.is_some_and(|pct| pct > config.cac_rise_threshold_pct),
        margin_volatility,
        margin_volatile: margin_volatility
            .is_some_and(|cv| cv.abs() > config.margin_volatility_threshold),
    })
}

pub fn generate_insights(
    daily: &[JoinedDailyRecord],
    marketing: &[MarketingRecord],
    summary: &ExecutiveSummary,
    config: &InsightConfig,
) -> Option<InsightReport> {
    let Some(findings) = derive_findings(daily, marketing, summary, config) else {
        log::warn!("insights: no channel with a defined ROAS; skipping narrative");
        return None;
    };

    let f = &findings;
    let high_aov_item = match (f.high_aov_days, f.high_aov_margin, f.other_days_margin) {
        (0, _, _) => format!(
            "Optimize High AOV Days: no day exceeded an AOV of ${:.0} in this period",
            f.high_aov_threshold
        ),
        (n, Some(high), Some(other)) => format!(
            "Optimize High AOV Days: {n} days with AOV above ${:.0} averaged {:.1}% gross margin vs {:.1}% on other days",
            f.high_aov_threshold,
            high * 100.0,
            other * 100.0
        ),
        (n, _, _) => format!(
            "Optimize High AOV Days: {n} days had AOV above ${:.0}",
            f.high_aov_threshold
        ),
    };
    let weekend_item = match (f.weekend_revenue, f.weekday_revenue) {
        (Some(we), Some(wd)) => format!(
            "Weekend Performance: weekend days average ${we:.0} revenue vs ${wd:.0} on weekdays ({:+.1}%)",
            or_zero(safe_ratio(we - wd, wd)) * 100.0
        ),
        _ => "Weekend Performance: not enough weekend and weekday coverage to compare".to_string(),
    };

    let cac_item = match (f.cac_earlier, f.cac_later, f.cac_change_pct) {
        (Some(e), Some(l), Some(pct)) if f.cac_rising => format!(
            "Customer Acquisition Cost: spend per new customer rose {pct:.1}% (${e:.2} to ${l:.2})"
        ),
        (Some(_), Some(l), Some(pct)) => format!(
            "Customer Acquisition Cost: spend per new customer is holding at ${l:.2} ({pct:+.1}%)"
        ),
        _ => "Customer Acquisition Cost: not enough new-customer data to assess the trend".to_string(),
    };
    let margin_item = match f.margin_volatility {
        Some(cv) if f.margin_volatile => format!(
            "Margin Optimization: daily gross margin varies {:.1}% around its mean - investigate COGS fluctuations",
            cv.abs() * 100.0
        ),
        Some(cv) => format!(
            "Margin Optimization: daily gross margin is steady ({:.1}% variation)",
            cv.abs() * 100.0
        ),
        None => "Margin Optimization: not enough margin data to assess volatility".to_string(),
    };

    let opportunities = InsightSection {
        title: "Top Opportunities".into(),
        items: vec![
            format!(
                "Scale {}: currently delivering {:.2}x ROAS - consider increasing budget allocation",
                f.best_channel.channel, f.best_channel.roas
            ),
            high_aov_item,
            weekend_item,
        ],
    };
    let improvements = InsightSection {
        title: "Areas for Improvement".into(),
        items: vec![
            format!(
                "Review {}: currently at {:.2}x ROAS - analyze or pause underperforming campaigns",
                f.worst_channel.channel, f.worst_channel.roas
            ),
            cac_item,
            margin_item,
        ],
    };

    Some(InsightReport {
        findings,
        opportunities,
        improvements,
    })
}
