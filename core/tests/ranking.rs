//! Ranker tests — stable ordering, undefined values lowest, top/bottom slices.

use adpulse_core::{
    aggregate::{channel_performance, GroupPerformance},
    rank::{rank, Direction, RankField},
    record::MarketingRecord,
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn spend_row(channel: &str, spend: f64, attributed: f64) -> MarketingRecord {
    MarketingRecord {
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        channel: channel.into(),
        campaign: "c".into(),
        tactic: "t".into(),
        spend,
        clicks: 1,
        impressions: 100,
        attributed_revenue: attributed,
    }
}

fn groups(rows: &[(&str, f64, f64)]) -> Vec<GroupPerformance> {
    let records: Vec<MarketingRecord> = rows
        .iter()
        .map(|(c, s, a)| spend_row(c, *s, *a))
        .collect();
    channel_performance(&records)
}

fn names(groups: &[GroupPerformance]) -> Vec<&str> {
    groups.iter().map(|g| g.channel()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// A (ROAS 3.0) ranks ahead of B (ROAS 1.0) descending.
#[test]
fn ranks_by_roas_descending() {
    let ranked = rank(
        &groups(&[("B", 200.0, 200.0), ("A", 100.0, 300.0)]),
        RankField::Roas,
        Direction::Descending,
    );
    assert_eq!(names(&ranked.ordered), vec!["A", "B"]);
}

/// A zero-spend group never shows up as a top performer.
#[test]
fn undefined_sorts_lowest() {
    let input = groups(&[("Zero", 0.0, 500.0), ("Low", 100.0, 50.0), ("High", 10.0, 90.0)]);

    let desc = rank(&input, RankField::Roas, Direction::Descending);
    assert_eq!(names(&desc.ordered), vec!["High", "Low", "Zero"]);
    assert_eq!(names(desc.top(2)), vec!["High", "Low"]);

    let asc = rank(&input, RankField::Roas, Direction::Ascending);
    assert_eq!(names(&asc.ordered), vec!["Zero", "Low", "High"]);
}

/// Ties keep their input order.
#[test]
fn sort_is_stable() {
    let input = groups(&[("A", 10.0, 20.0), ("B", 50.0, 100.0), ("C", 1.0, 2.0)]);
    let ranked = rank(&input, RankField::Roas, Direction::Descending);
    assert_eq!(names(&ranked.ordered), vec!["A", "B", "C"]);
}

/// top(n) + middle + reversed bottom(n) reconstructs the full order.
#[test]
fn top_and_bottom_partition_the_ranking() {
    let input = groups(&[
        ("A", 10.0, 10.0),
        ("B", 10.0, 30.0),
        ("C", 10.0, 30.0),
        ("D", 0.0, 5.0),
        ("E", 10.0, 5.0),
        ("F", 10.0, 70.0),
        ("G", 10.0, 20.0),
    ]);
    let ranked = rank(&input, RankField::Roas, Direction::Descending);
    let n = 3;

    let top = ranked.top(n).to_vec();
    let mut bottom_in_order = ranked.bottom(n);
    bottom_in_order.reverse();
    let middle = &ranked.ordered[n..ranked.len() - n];

    let rebuilt: Vec<GroupPerformance> = top
        .into_iter()
        .chain(middle.iter().cloned())
        .chain(bottom_in_order)
        .collect();
    assert_eq!(rebuilt, ranked.ordered);
}

/// bottom(n) lists the last-ranked entry first.
#[test]
fn bottom_is_reversed_suffix() {
    let input = groups(&[("A", 10.0, 10.0), ("B", 10.0, 30.0), ("C", 10.0, 20.0)]);
    let ranked = rank(&input, RankField::Roas, Direction::Descending);
    assert_eq!(names(&ranked.bottom(2)), vec!["A", "C"]);
}

/// Asking for more than exists returns everything, never panics.
#[test]
fn oversized_slices_are_clamped() {
    let input = groups(&[("A", 10.0, 10.0), ("B", 10.0, 30.0)]);
    let ranked = rank(&input, RankField::Spend, Direction::Descending);
    assert_eq!(ranked.top(10).len(), 2);
    assert_eq!(ranked.bottom(10).len(), 2);
    assert!(rank(&[], RankField::Roas, Direction::Descending).top(5).is_empty());
}

/// Raw metrics rank too.
#[test]
fn ranks_by_spend() {
    let input = groups(&[("A", 10.0, 10.0), ("B", 30.0, 0.0), ("C", 20.0, 0.0)]);
    let ranked = rank(&input, RankField::Spend, Direction::Descending);
    assert_eq!(names(&ranked.ordered), vec!["B", "C", "A"]);
    assert_eq!("attributed_revenue".parse::<RankField>().unwrap(), RankField::AttributedRevenue);
    assert!("bogus".parse::<RankField>().is_err());
}
