//! Deterministic demo dataset for running without CSV files.
//!
//! All randomness flows from one seed through a PCG stream, so the same
//! seed always yields the same dataset.

use adpulse_core::{
    dataset::Dataset,
    record::{BusinessRecord, MarketingRecord},
};
use chrono::{Duration, NaiveDate};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const CAMPAIGNS: [&str; 3] = ["Prospecting", "Retargeting", "Brand"];
const TACTICS: [&str; 2] = ["ASC", "Lookalike"];

struct DemoRng {
    inner: Pcg64Mcg,
}

impl DemoRng {
    fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform float in [lo, hi).
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// `days` consecutive days ending at `end`, one marketing row per
/// channel × campaign × tactic per day.
pub fn generate(seed: u64, days: u32, end: NaiveDate, channels: &[String]) -> Dataset {
    let mut rng = DemoRng::new(seed);
    let start = end - Duration::days(i64::from(days.saturating_sub(1)));

    let mut business = Vec::with_capacity(days as usize);
    let mut marketing = Vec::new();

    for offset in 0..i64::from(days) {
        let date = start + Duration::days(offset);
        let mut attributed_today = 0.0;

        for (ci, channel) in channels.iter().enumerate() {
            let channel_efficiency = 1.5 + ci as f64 * 0.8;
            for campaign in CAMPAIGNS {
                for tactic in TACTICS {
                    let spend = (rng.between(20.0, 400.0) * 100.0).round() / 100.0;
                    let impressions = rng.between(2_000.0, 40_000.0) as u64;
                    let clicks = (impressions as f64 * rng.between(0.005, 0.03)) as u64;
                    let roas = channel_efficiency * rng.between(0.4, 1.6);
                    let attributed_revenue = (spend * roas * 100.0).round() / 100.0;
                    attributed_today += attributed_revenue;
                    marketing.push(MarketingRecord {
                        date,
                        channel: channel.clone(),
                        campaign: format!("{channel} {campaign}"),
                        tactic: tactic.to_string(),
                        spend,
                        clicks,
                        impressions,
                        attributed_revenue,
                    });
                }
            }
        }

        let total_revenue = ((attributed_today * rng.between(1.2, 1.8)) * 100.0).round() / 100.0;
        let order_count = (total_revenue / rng.between(70.0, 110.0)).round() as u64;
        let new_order_count = (order_count as f64 * rng.between(0.2, 0.4)).round() as u64;
        let cogs = (total_revenue * rng.between(0.45, 0.6) * 100.0).round() / 100.0;
        business.push(BusinessRecord {
            date,
            order_count,
            new_customers: (new_order_count as f64 * rng.between(0.8, 1.0)).round() as u64,
            new_order_count,
            total_revenue,
            gross_profit: total_revenue - cogs,
            cogs,
        });
    }

    log::debug!(
        "synthetic: seed={seed} days={days} business={} marketing={}",
        business.len(),
        marketing.len()
    );
    Dataset::new(business, marketing)
}
