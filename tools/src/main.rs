//! dashboard-runner: headless runner for the AdPulse metrics pipeline.
//!
//! Usage:
//!   dashboard-runner --data-dir ./dataset --period last-30 --channel Google
//!   dashboard-runner --data-dir ./dataset --today 2024-06-30 --json
//!   dashboard-runner --synthetic --seed 42 --days 120

mod loader;
mod synthetic;

use adpulse_core::{
    config::MetricsConfig,
    dataset::Dataset,
    filter::{ChannelFilter, MetricsFilter, TimePeriod},
    format::{format_count, format_currency, format_rows, format_value, FormatKind, FormatSpec},
    pipeline::{DashboardReport, MetricsPipeline},
    schema::parse_date,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./dataset");
    let json_mode = args.iter().any(|a| a == "--json");
    let synthetic_mode = args.iter().any(|a| a == "--synthetic");
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 120u32);

    let config = if synthetic_mode {
        MetricsConfig::default()
    } else {
        MetricsConfig::load(data_dir)?
    };

    let period = match flag_value(&args, "--period") {
        Some(p) => p.parse::<TimePeriod>()?,
        None => config.default_period,
    };
    let channel: ChannelFilter = flag_value(&args, "--channel")
        .unwrap_or("All")
        .parse()
        .unwrap_or_default();
    let today = match flag_value(&args, "--today") {
        Some(raw) => {
            let date = parse_date(raw).with_context(|| format!("Invalid --today date '{raw}'"))?;
            Some(date)
        }
        None => None,
    };

    let dataset = if synthetic_mode {
        let end = today.unwrap_or_else(|| Local::now().date_naive());
        let channels: Vec<String> = config.marketing_files.keys().cloned().collect();
        synthetic::generate(seed, days, end, &channels)
    } else {
        loader::load_dataset(data_dir, &config)?
    };

    // Without --today the window ends at the latest date in the data.
    let anchor = today
        .or_else(|| dataset.latest_date())
        .unwrap_or_else(|| Local::now().date_naive());
    let filter = MetricsFilter::for_period(period, anchor, channel);

    if !json_mode {
        print_header(&dataset, period, anchor, &filter);
    }

    let pipeline = MetricsPipeline::new(config);
    let report = pipeline.run(&dataset, &filter)?;

    if json_mode {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_header(dataset: &Dataset, period: TimePeriod, anchor: NaiveDate, filter: &MetricsFilter) {
    let info = dataset.info();
    println!("AdPulse dashboard-runner");
    println!("  business rows:  {}", info.business_records);
    println!("  marketing rows: {}", info.marketing_records);
    if let Some(range) = info.date_range {
        println!("  data range:     {} .. {}", range.start, range.end);
    }
    println!("  channels:       {}", info.channels.join(", "));
    println!("  period:         {period} (ending {anchor})");
    println!("  channel filter: {}", filter.channel);
    println!();
}

fn print_report(report: &DashboardReport) {
    let s = &report.summary;
    println!("=== EXECUTIVE SUMMARY ===");
    println!(
        "  Total Revenue:       {} ({:+.1}%)",
        format_currency(s.total_revenue),
        s.revenue_growth_pct
    );
    println!(
        "  Marketing ROAS:      {}",
        format_value(FormatKind::Multiplier, Some(s.overall_roas))
    );
    println!(
        "  Average Order Value: ${:.2} ({} orders)",
        s.avg_aov,
        format_count(s.total_orders)
    );
    println!(
        "  Gross Margin:        {:.1}% ({} ad spend)",
        s.gross_margin_pct,
        format_currency(s.total_spend)
    );
    println!("  New Customers:       {}", format_count(s.total_customers));

    println!();
    println!("=== CHANNEL PERFORMANCE ===");
    for row in format_rows(&report.channels, &FormatSpec::group_table()) {
        println!(
            "  {:<12} spend {:>10} | revenue {:>10} | ROAS {:>7} | CTR {:>7} | CPC {:>6}",
            row.get("channel").unwrap_or_default(),
            row.get("spend").unwrap_or_default(),
            row.get("attributed_revenue").unwrap_or_default(),
            row.get("roas").unwrap_or_default(),
            row.get("ctr").unwrap_or_default(),
            row.get("cpc").unwrap_or_default(),
        );
    }

    let campaign_spec = FormatSpec::campaign_table();
    for (title, rows) in [
        ("TOP CAMPAIGNS BY ROAS", &report.top_campaigns),
        ("BOTTOM CAMPAIGNS BY ROAS", &report.bottom_campaigns),
    ] {
        println!();
        println!("=== {title} ===");
        for row in format_rows(rows, &campaign_spec) {
            println!(
                "  {:<10} {:<28} spend {:>9} | revenue {:>9} | ROAS {:>7}",
                row.get("channel").unwrap_or_default(),
                row.get("campaign").unwrap_or_default(),
                row.get("spend").unwrap_or_default(),
                row.get("attributed_revenue").unwrap_or_default(),
                row.get("roas").unwrap_or_default(),
            );
        }
    }

    let i = &report.insights;
    println!();
    println!("=== ADVANCED INSIGHTS ===");
    println!(
        "  Revenue volatility:    {}",
        format_value(FormatKind::Percentage, i.revenue_volatility.map(|v| v * 100.0))
    );
    if let (Some(day), Some(revenue)) = (&i.best_day_of_week, i.best_day_revenue) {
        println!("  Best day of week:      {day} ({})", format_currency(revenue));
    }
    println!("  ROAS trend:            {:+.1}%", i.roas_trend_pct);
    println!(
        "  Channel concentration: {}",
        format_value(FormatKind::Percentage, Some(i.channel_concentration * 100.0))
    );

    println!();
    match &report.narrative {
        None => println!("Not enough data to generate insights."),
        Some(narrative) => {
            for section in [&narrative.opportunities, &narrative.improvements] {
                println!("=== {} ===", section.title.to_uppercase());
                for (n, item) in section.items.iter().enumerate() {
                    println!("  {}. {item}", n + 1);
                }
                println!();
            }
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
