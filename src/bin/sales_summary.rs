//! Sales summary in the terminal
//! Run: ./target/release/sales_summary <INPUT> [--json]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use superstore_dashboard::aggregate::{Aggregate, SalesSummary};
use superstore_dashboard::format::{format_count, format_currency, format_percent};
use superstore_dashboard::pipeline;
use tracing_subscriber::EnvFilter;

/// Print the Superstore aggregates without rendering a report
#[derive(Parser, Debug)]
#[command(name = "sales_summary")]
#[command(about = "Print sales aggregates for a Superstore CSV")]
struct Args {
    /// Input CSV path
    input: PathBuf,

    /// Print the summary as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn print_section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(50));
}

fn print_aggregate(title: &str, aggregate: &Aggregate, with_shares: bool) {
    print_section(title);
    for (entry, share) in aggregate.entries().iter().zip(aggregate.shares()) {
        if with_shares {
            println!("  {:28} {:>14} {:>7}", entry.key, format_currency(entry.value), format_percent(share.value));
        } else {
            println!("  {:28} {:>14}", entry.key, format_currency(entry.value));
        }
    }
}

fn print_summary(summary: &SalesSummary) {
    println!("\n{}", "=".repeat(60));
    println!("            SUPERSTORE SALES SUMMARY");
    println!("{}", "=".repeat(60));

    let m = &summary.metrics;
    print_section("KEY METRICS");
    println!("  Total Revenue:     {:>14}", format_currency(m.total_sales));
    println!("  Unique Orders:     {:>14}", format_count(m.total_orders));
    println!("  Avg Order Value:   {:>14}", format_currency(m.average_order_value));
    println!("  Top Region:        {:>14}", m.top_region.as_deref().unwrap_or("N/A"));
    if let Some(range) = summary.date_range {
        println!("  Order Dates:       {} to {}", range.first, range.last);
    }

    print_aggregate("SALES BY REGION", &summary.by_region.canonical, false);
    if !summary.by_region.unrecognized.is_empty() {
        print_aggregate("UNRECOGNIZED REGIONS", &summary.by_region.unrecognized, false);
    }

    print_section("QUARTERLY REVENUE");
    println!("  {:>6} {:>12} {:>12} {:>12} {:>12} {:>14}", "Year", "Q1", "Q2", "Q3", "Q4", "Total");
    for year in &summary.by_quarter.years {
        let [q1, q2, q3, q4] = year.quarters.map(format_currency);
        println!(
            "  {:>6} {:>12} {:>12} {:>12} {:>12} {:>14}",
            year.year,
            q1,
            q2,
            q3,
            q4,
            format_currency(year.total)
        );
    }

    print_aggregate("SALES BY CATEGORY", &summary.by_category, false);
    print_aggregate("TOP SUB-CATEGORIES", &summary.top_sub_categories, false);
    print_aggregate("SALES BY SEGMENT", &summary.by_segment, true);
    print_aggregate("TOP CUSTOMERS", &summary.top_customers, false);

    let report = &summary.normalization;
    print_section("DATA QUALITY");
    println!("  Rows read:         {:>10}", format_count(report.rows_read));
    println!("  Rows retained:     {:>10}", format_count(report.retained));
    println!("  Malformed rows:    {:>10}", format_count(report.malformed_rows));
    println!("  Invalid dates:     {:>10}", format_count(report.invalid_dates));
    println!("  Invalid sales:     {:>10}", format_count(report.invalid_sales));
    println!("  Month-first dates: {:>10}", format_count(report.month_first_dates));
    println!("  Ambiguous dates:   {:>10}", format_count(report.ambiguous_dates));

    println!("\n{}", "=".repeat(60));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let summary = pipeline::analyze_file(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}
