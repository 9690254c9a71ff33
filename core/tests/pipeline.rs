//! Pipeline tests — end-to-end report, idempotence, filter contexts.

use adpulse_core::{
    config::MetricsConfig,
    dataset::Dataset,
    filter::{ChannelFilter, MetricsFilter, TimePeriod},
    join::join_and_derive,
    pipeline::MetricsPipeline,
    record::{BusinessRecord, MarketingRecord},
};
use chrono::{Duration, NaiveDate};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// 20 days, three channels with different efficiency, two campaigns each.
fn dataset() -> Dataset {
    let channels = [("Facebook", 2.0), ("Google", 3.0), ("TikTok", 0.5)];
    let mut business = Vec::new();
    let mut marketing = Vec::new();
    for n in 0..20u32 {
        let date = start() + Duration::days(i64::from(n));
        let revenue = 1_000.0 + f64::from(n) * 25.0;
        business.push(BusinessRecord {
            date,
            order_count: 20,
            new_customers: 6,
            new_order_count: 8,
            total_revenue: revenue,
            gross_profit: revenue * 0.35,
            cogs: revenue * 0.65,
        });
        for (channel, roas) in channels {
            for campaign in ["Always On", "Promo"] {
                let spend = if campaign == "Promo" { 20.0 } else { 40.0 };
                marketing.push(MarketingRecord {
                    date,
                    channel: channel.into(),
                    campaign: campaign.into(),
                    tactic: if n % 2 == 0 { "ASC".into() } else { "Retargeting".into() },
                    spend,
                    clicks: 15,
                    impressions: 1_500,
                    attributed_revenue: spend * roas,
                });
            }
        }
    }
    Dataset::new(business, marketing)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Same inputs and filter, identical output.
#[test]
fn join_is_idempotent() {
    let data = dataset();
    let filter = MetricsFilter::all_time().since(start() + Duration::days(5)).channel("Google");
    let a = join_and_derive(&data.business, &data.marketing, &filter).unwrap();
    let b = join_and_derive(&data.business, &data.marketing, &filter).unwrap();
    assert_eq!(a, b);
}

/// Whole pipeline runs twice to the same report, byte for byte in JSON.
#[test]
fn pipeline_is_idempotent() {
    let data = dataset();
    let pipeline = MetricsPipeline::new(MetricsConfig::default());
    let filter = MetricsFilter::all_time();

    let a = pipeline.run(&data, &filter).unwrap();
    let b = pipeline.run(&data, &filter).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

/// The report wires every stage together.
#[test]
fn report_contains_every_view() {
    let data = dataset();
    let report = MetricsPipeline::new(MetricsConfig::default())
        .run(&data, &MetricsFilter::all_time())
        .unwrap();

    assert_eq!(report.daily.len(), 20);
    assert_eq!(report.channels.len(), 3);
    assert_eq!(report.campaigns.len(), 6);
    assert_eq!(report.tactics.len(), 6);
    assert_eq!(report.top_campaigns.len(), 6, "fewer campaigns than top_n");
    assert_eq!(report.top_campaigns[0].channel(), "Google");
    assert_eq!(report.bottom_campaigns[0].channel(), "TikTok");

    let narrative = report.narrative.as_ref().expect("narrative");
    assert_eq!(narrative.findings.best_channel.channel, "Google");
    assert_eq!(narrative.findings.worst_channel.channel, "TikTok");

    // Facebook 2.0, Google 3.0, TikTok 0.5 on equal spend → mean 11/6.
    let roas = report.summary.overall_roas;
    assert!((roas - 5.5 / 3.0).abs() < 1e-9, "overall_roas = {roas}");
    assert!((report.insights.channel_concentration - 1.0 / 3.0).abs() < 1e-9);
}

/// Channel filter narrows marketing but keeps every business day.
#[test]
fn channel_filter_keeps_business_days() {
    let data = dataset();
    let filter = MetricsFilter {
        min_date: None,
        channel: ChannelFilter::Only("TikTok".into()),
    };
    let report = MetricsPipeline::new(MetricsConfig::default())
        .run(&data, &filter)
        .unwrap();

    assert_eq!(report.daily.len(), 20);
    assert_eq!(report.channels.len(), 1);
    assert_eq!(report.insights.channel_concentration, 1.0);
    assert!((report.summary.overall_roas - 0.5).abs() < 1e-12);
}

/// A filter that removes everything degrades to empty output.
#[test]
fn empty_filter_context_degrades_gracefully() {
    let data = dataset();
    let filter = MetricsFilter::all_time().since(start() + Duration::days(365));
    let report = MetricsPipeline::new(MetricsConfig::default())
        .run(&data, &filter)
        .unwrap();

    assert!(report.daily.is_empty());
    assert!(report.channels.is_empty());
    assert!(report.top_campaigns.is_empty());
    assert_eq!(report.summary.total_revenue, 0.0);
    assert_eq!(report.summary.overall_roas, 0.0);
    assert!(report.narrative.is_none());
}

/// Preset periods cover N calendar days ending at the anchor.
#[test]
fn time_periods_resolve_relative_to_anchor() {
    let anchor = start() + Duration::days(19);
    let filter = MetricsFilter::for_period(TimePeriod::Last7Days, anchor, ChannelFilter::All);
    assert_eq!(filter.min_date, Some(start() + Duration::days(13)));

    let report = MetricsPipeline::new(MetricsConfig::default())
        .run(&dataset(), &filter)
        .unwrap();
    assert_eq!(report.daily.len(), 7);

    assert_eq!(TimePeriod::AllTime.min_date(anchor), None);
    assert_eq!("last-30".parse::<TimePeriod>().unwrap(), TimePeriod::Last30Days);
    assert_eq!("All Time".parse::<TimePeriod>().unwrap(), TimePeriod::AllTime);
    assert!("fortnight".parse::<TimePeriod>().is_err());
}

/// Independent filter contexts can be computed in parallel over shared data.
#[test]
fn filter_contexts_run_in_parallel() {
    let data = dataset();
    let pipeline = MetricsPipeline::new(MetricsConfig::default());
    let channels = data.channels();

    let parallel: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = channels
            .iter()
            .map(|c| {
                let (data, pipeline) = (&data, &pipeline);
                scope.spawn(move || {
                    let filter = MetricsFilter::all_time().channel(c.clone());
                    pipeline.run(data, &filter).unwrap().summary.overall_roas
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let sequential: Vec<f64> = channels
        .iter()
        .map(|c| {
            let filter = MetricsFilter::all_time().channel(c.clone());
            pipeline.run(&data, &filter).unwrap().summary.overall_roas
        })
        .collect();
    assert_eq!(parallel, sequential);
}
