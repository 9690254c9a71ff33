//! The metrics pipeline — wires every stage for one filter context.
//!
//! STAGE ORDER:
//!   1. Join & Derive          (filter applied here)
//!   2. Aggregate              (channel, campaign, tactic)
//!   3. Rank                   (campaigns by ROAS)
//!   4. Executive summary
//!   5. Advanced insights + narrative
//!
//! RULES:
//!   - Every stage is a pure function of the previous stages' outputs.
//!   - Nothing is cached between runs; callers own memoization.

use crate::{
    aggregate::{aggregate, GroupBy, GroupPerformance},
    config::MetricsConfig,
    dataset::{DataInfo, Dataset},
    error::MetricsResult,
    filter::MetricsFilter,
    insight::{advanced_insights, generate_insights, AdvancedInsights, InsightReport},
    join::join_and_derive,
    rank::{rank, Direction, RankField, Ranking},
    record::{JoinedDailyRecord, MarketingRecord},
    summary::{cost_breakdown, executive_summary, CostBreakdown, ExecutiveSummary},
};
use serde::Serialize;

/// Everything the presentation layer renders for one filter context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub filter: MetricsFilter,
    pub data_info: DataInfo,
    pub daily: Vec<JoinedDailyRecord>,
    pub marketing: Vec<MarketingRecord>,
    pub channels: Vec<GroupPerformance>,
    pub campaigns: Ranking,
    pub top_campaigns: Vec<GroupPerformance>,
    pub bottom_campaigns: Vec<GroupPerformance>,
    pub tactics: Vec<GroupPerformance>,
    pub summary: ExecutiveSummary,
    pub cost_breakdown: CostBreakdown,
    pub insights: AdvancedInsights,
    /// `None` when there is not enough data for a narrative.
    pub narrative: Option<InsightReport>,
}

impl DashboardReport {
    pub fn to_json(&self) -> MetricsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct MetricsPipeline {
    config: MetricsConfig,
}

impl MetricsPipeline {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn run(&self, dataset: &Dataset, filter: &MetricsFilter) -> MetricsResult<DashboardReport> {
        let joined = join_and_derive(&dataset.business, &dataset.marketing, filter)?;

        let channels = aggregate(&joined.marketing, GroupBy::Channel);
        let campaigns = rank(
            &aggregate(&joined.marketing, GroupBy::ChannelCampaign),
            RankField::Roas,
            Direction::Descending,
        );
        let tactics = aggregate(&joined.marketing, GroupBy::ChannelTactic);

        let top_n = self.config.insights.top_n;
        let top_campaigns = campaigns.top(top_n).to_vec();
        let bottom_campaigns = campaigns.bottom(top_n);

        let summary = executive_summary(&joined.daily);
        let insights = advanced_insights(&joined.daily, &joined.marketing);
        let narrative = generate_insights(
            &joined.daily,
            &joined.marketing,
            &summary,
            &self.config.insights,
        );

        log::info!(
            "pipeline: {} days, {} channels, {} campaigns, {} tactics (channel filter: {})",
            joined.daily.len(),
            channels.len(),
            campaigns.len(),
            tactics.len(),
            filter.channel
        );

        Ok(DashboardReport {
            filter: filter.clone(),
            data_info: dataset.info(),
            cost_breakdown: cost_breakdown(&joined.daily),
            daily: joined.daily,
            marketing: joined.marketing,
            channels,
            campaigns,
            top_campaigns,
            bottom_campaigns,
            tactics,
            summary,
            insights,
            narrative,
        })
    }
}
