//! Join & Derive tests — one row per business date, zero-filled marketing,
//! ratios derived through the safe ratio utility.

use adpulse_core::{
    error::MetricsError,
    filter::MetricsFilter,
    join::{daily_marketing_totals, join_and_derive},
    record::{BusinessRecord, MarketingRecord},
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn business(d: u32, orders: u64, revenue: f64) -> BusinessRecord {
    BusinessRecord {
        date: day(d),
        order_count: orders,
        new_customers: orders / 2,
        new_order_count: orders / 2,
        total_revenue: revenue,
        gross_profit: revenue * 0.4,
        cogs: revenue * 0.6,
    }
}

fn marketing(d: u32, channel: &str, spend: f64, attributed: f64) -> MarketingRecord {
    MarketingRecord {
        date: day(d),
        channel: channel.into(),
        campaign: format!("{channel} campaign"),
        tactic: "ASC".into(),
        spend,
        clicks: 10,
        impressions: 1_000,
        attributed_revenue: attributed,
    }
}

fn three_day_example() -> (Vec<BusinessRecord>, Vec<MarketingRecord>) {
    let business = vec![
        business(1, 10, 100.0),
        business(2, 20, 200.0),
        business(3, 30, 300.0),
    ];
    let marketing = vec![
        marketing(1, "Facebook", 50.0, 100.0),
        marketing(3, "Facebook", 100.0, 50.0),
    ];
    (business, marketing)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Revenues [100,200,300], spend [50,0,100], attributed [100,0,50]
/// give ROAS [2.0, undefined, 0.5].
#[test]
fn roas_example_with_zero_spend_day() {
    let (business, marketing) = three_day_example();
    let joined = join_and_derive(&business, &marketing, &MetricsFilter::all_time()).unwrap();

    let roas: Vec<Option<f64>> = joined.daily.iter().map(|d| d.marketing_roas).collect();
    assert_eq!(roas, vec![Some(2.0), None, Some(0.5)]);
}

/// Days without marketing activity keep all four summed fields at zero.
#[test]
fn days_without_marketing_are_zero_filled() {
    let (business, marketing) = three_day_example();
    let joined = join_and_derive(&business, &marketing, &MetricsFilter::all_time()).unwrap();

    let quiet = &joined.daily[1];
    assert_eq!(quiet.date, day(2));
    assert_eq!(quiet.spend, 0.0);
    assert_eq!(quiet.clicks, 0);
    assert_eq!(quiet.impressions, 0);
    assert_eq!(quiet.attributed_revenue, 0.0);
    assert_eq!(quiet.ctr, None, "no impressions means undefined CTR");
    assert_eq!(quiet.cpc, None, "no clicks means undefined CPC");
}

/// Exactly one output row per business date, ascending, regardless of how
/// many marketing rows share the date.
#[test]
fn one_row_per_business_date() {
    let business = vec![business(3, 5, 50.0), business(1, 5, 50.0), business(2, 5, 50.0)];
    let marketing = vec![
        marketing(1, "Facebook", 10.0, 20.0),
        marketing(1, "Google", 30.0, 60.0),
        marketing(1, "TikTok", 5.0, 0.0),
        marketing(9, "Google", 30.0, 60.0),
    ];
    let joined = join_and_derive(&business, &marketing, &MetricsFilter::all_time()).unwrap();

    let dates: Vec<NaiveDate> = joined.daily.iter().map(|d| d.date).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3)]);

    let first = &joined.daily[0];
    assert_eq!(first.spend, 45.0, "all same-date channels are summed");
    assert_eq!(first.attributed_revenue, 80.0);
    assert_eq!(first.clicks, 30);
    assert_eq!(first.impressions, 3_000);
}

/// Per-day derived fields match the formulas.
#[test]
fn derived_fields_follow_formulas() {
    let business = vec![business(1, 4, 200.0)];
    let marketing = vec![marketing(1, "Google", 25.0, 75.0)];
    let joined = join_and_derive(&business, &marketing, &MetricsFilter::all_time()).unwrap();
    let d = &joined.daily[0];

    assert_eq!(d.marketing_roas, Some(3.0));
    assert_eq!(d.ctr, Some(0.01));
    assert_eq!(d.cpc, Some(2.5));
    assert_eq!(d.gross_margin, Some(0.4));
    assert_eq!(d.aov, Some(50.0));
    assert_eq!(d.new_customer_rate, Some(0.5));
}

/// Zero orders and zero revenue leave the related ratios undefined.
#[test]
fn zero_order_day_has_undefined_aov() {
    let business = vec![business(1, 0, 0.0)];
    let joined = join_and_derive(&business, &[], &MetricsFilter::all_time()).unwrap();
    let d = &joined.daily[0];

    assert_eq!(d.aov, None);
    assert_eq!(d.new_customer_rate, None);
    assert_eq!(d.gross_margin, None);
    assert_eq!(d.marketing_roas, None);
}

/// The date filter applies to both tables independently; the channel filter
/// only to marketing.
#[test]
fn filters_apply_to_each_table() {
    let business = vec![business(1, 5, 50.0), business(2, 5, 50.0), business(3, 5, 50.0)];
    let marketing = vec![
        marketing(1, "Google", 10.0, 10.0),
        marketing(2, "Google", 10.0, 10.0),
        marketing(2, "Facebook", 99.0, 10.0),
        marketing(3, "Google", 10.0, 40.0),
    ];
    let filter = MetricsFilter::all_time().since(day(2)).channel("Google");
    let joined = join_and_derive(&business, &marketing, &filter).unwrap();

    assert_eq!(joined.daily.len(), 2, "business day 1 is before min_date");
    assert_eq!(joined.marketing.len(), 2, "only Google rows on or after day 2");
    assert!(joined.marketing.iter().all(|m| m.channel == "Google"));
    assert_eq!(joined.daily[0].spend, 10.0, "Facebook spend is excluded");
    assert_eq!(joined.daily[1].marketing_roas, Some(4.0));
}

/// Empty business input is an empty result, not an error.
#[test]
fn empty_business_input_yields_empty_table() {
    let marketing = vec![marketing(1, "Google", 10.0, 10.0)];
    let joined = join_and_derive(&[], &marketing, &MetricsFilter::all_time()).unwrap();
    assert!(joined.daily.is_empty());
    assert_eq!(joined.marketing.len(), 1, "filtered marketing is still returned");
}

/// Two business records for one date violate the one-row-per-date invariant.
#[test]
fn duplicate_business_date_is_rejected() {
    let business = vec![business(1, 5, 50.0), business(1, 6, 60.0)];
    let err = join_and_derive(&business, &[], &MetricsFilter::all_time()).unwrap_err();
    assert!(
        matches!(err, MetricsError::DuplicateDate { date } if date == day(1)),
        "unexpected error: {err}"
    );
}

/// The caller's tables are left untouched.
#[test]
fn inputs_are_not_mutated() {
    let (business, marketing) = three_day_example();
    let (business_before, marketing_before) = (business.clone(), marketing.clone());
    let filter = MetricsFilter::all_time().since(day(2)).channel("Facebook");
    let _ = join_and_derive(&business, &marketing, &filter).unwrap();
    assert_eq!(business, business_before);
    assert_eq!(marketing, marketing_before);
}

/// Daily totals have one entry per date with any marketing activity.
#[test]
fn daily_totals_cover_only_active_dates() {
    let marketing = vec![
        marketing(1, "Google", 10.0, 10.0),
        marketing(1, "Facebook", 5.0, 0.0),
        marketing(4, "Google", 1.0, 2.0),
    ];
    let totals = daily_marketing_totals(&marketing);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[&day(1)].spend, 15.0);
    assert_eq!(totals[&day(4)].attributed_revenue, 2.0);
}
