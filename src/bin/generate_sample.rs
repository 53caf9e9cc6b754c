//! Sample data generator for the Superstore dashboard
//!
//! Writes a Superstore-shaped sales CSV with controlled random variation,
//! including rows in month-first date format and a share of deliberately
//! broken rows so the normalization path gets exercised.
//!
//! Usage:
//!   cargo run --release --bin generate_sample -- [OPTIONS]
//!
//! Options:
//!   --orders <N>          Number of orders to generate (default: 2000)
//!   --first-year <Y>      First order year (default: 2015)
//!   --last-year <Y>       Last order year (default: 2018)
//!   --month-first-rate <F> Share of rows written as MM/DD/YYYY (default: 0.3)
//!   --invalid-rate <F>    Share of rows with a broken date or sales value (default: 0.01)
//!   --seed <N>            Random seed for reproducibility (optional)
//!   --output <PATH>       Output CSV path (default: data/sample_superstore.csv)

use chrono::{Duration, NaiveDate};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

/// Sample Superstore dataset generator
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Generate a sample Superstore sales CSV")]
struct Args {
    /// Number of orders (each order has one to four line items)
    #[arg(long, default_value = "2000")]
    orders: usize,

    /// First order year
    #[arg(long, default_value = "2015")]
    first_year: i32,

    /// Last order year
    #[arg(long, default_value = "2018")]
    last_year: i32,

    /// Share of rows whose order date is written month-first (0.0 - 1.0)
    #[arg(long, default_value = "0.3")]
    month_first_rate: f64,

    /// Share of rows with an unparseable date or sales value (0.0 - 1.0)
    #[arg(long, default_value = "0.01")]
    invalid_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/sample_superstore.csv")]
    output: PathBuf,
}

/// Output row, column names as in the Superstore export
#[derive(Debug, Clone, Serialize)]
struct OutputRecord {
    #[serde(rename = "Row ID")]
    row_id: usize,
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Customer Name")]
    customer_name: String,
    #[serde(rename = "Segment")]
    segment: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub-Category")]
    sub_category: String,
    #[serde(rename = "Sales")]
    sales: String,
}

const REGIONS: [(&str, f64); 4] = [("West", 0.32), ("East", 0.28), ("Central", 0.23), ("South", 0.17)];

const SEGMENTS: [(&str, f64); 3] = [("Consumer", 0.52), ("Corporate", 0.30), ("Home Office", 0.18)];

const CATALOG: [(&str, &[(&str, f64)]); 3] = [
    (
        "Furniture",
        &[("Bookcases", 500.0), ("Chairs", 530.0), ("Furnishings", 95.0), ("Tables", 650.0)],
    ),
    (
        "Office Supplies",
        &[
            ("Appliances", 230.0),
            ("Art", 34.0),
            ("Binders", 130.0),
            ("Envelopes", 65.0),
            ("Fasteners", 14.0),
            ("Labels", 35.0),
            ("Paper", 60.0),
            ("Storage", 260.0),
            ("Supplies", 120.0),
        ],
    ),
    (
        "Technology",
        &[("Accessories", 215.0), ("Copiers", 2200.0), ("Machines", 1650.0), ("Phones", 380.0)],
    ),
];

const FIRST_NAMES: [&str; 16] = [
    "Claire", "Darrin", "Sean", "Brosina", "Andrew", "Irene", "Harold", "Pete", "Alejandro", "Zuschuss",
    "Ken", "Sandra", "Emily", "Eric", "Tracy", "Matt",
];
const LAST_NAMES: [&str; 12] = [
    "Gute", "Van Huff", "O'Donnell", "Hoffman", "Allen", "Maddox", "Pawlan", "Kriz", "Grove", "Carroll",
    "Black", "Flanagan",
];

/// Pick an item by relative weight
fn weighted<'a, T>(items: &'a [(T, f64)], rng: &mut impl Rng) -> &'a T {
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen::<f64>() * total;
    for (item, weight) in items {
        if roll < *weight {
            return item;
        }
        roll -= weight;
    }
    &items[items.len() - 1].0
}

fn random_date(first_year: i32, last_year: i32, rng: &mut impl Rng) -> NaiveDate {
    let start = NaiveDate::from_ymd_opt(first_year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(last_year, 12, 31).unwrap_or(start);
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}

fn customer_pool(size: usize, rng: &mut impl Rng) -> Vec<(String, &'static str)> {
    (0..size)
        .map(|_| {
            let name = format!(
                "{} {}",
                FIRST_NAMES.choose(rng).copied().unwrap_or("Pat"),
                LAST_NAMES.choose(rng).copied().unwrap_or("Doe")
            );
            let segment = *weighted(&SEGMENTS, rng);
            (name, segment)
        })
        .collect()
}

fn format_date(date: NaiveDate, month_first: bool) -> String {
    if month_first {
        date.format("%m/%d/%Y").to_string()
    } else {
        date.format("%d/%m/%Y").to_string()
    }
}

/// Break either the date or the sales value of a row
fn corrupt(record: &mut OutputRecord, rng: &mut impl Rng) {
    if rng.gen_bool(0.5) {
        record.order_date = ["99/99/9999", "", "2016-13-45"]
            .choose(rng)
            .copied()
            .unwrap_or("")
            .to_string();
    } else {
        record.sales = ["", "n/a", "#VALUE!"].choose(rng).copied().unwrap_or("").to_string();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if args.last_year < args.first_year {
        return Err("--last-year must not be before --first-year".into());
    }

    println!("Sample Superstore Generator");
    println!("{}", "━".repeat(60));
    println!("Orders:           {}", args.orders);
    println!("Years:            {} - {}", args.first_year, args.last_year);
    println!("Month-first rate: {:.1}%", args.month_first_rate * 100.0);
    println!("Invalid rate:     {:.1}%", args.invalid_rate * 100.0);
    println!("Output:           {}", args.output.display());
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(true).from_path(&args.output)?;

    let customers = customer_pool((args.orders / 12).max(20), &mut rng);
    let mut row_id = 0;
    let mut invalid_rows = 0;
    for _ in 0..args.orders {
        let date = random_date(args.first_year, args.last_year, &mut rng);
        let region = *weighted(&REGIONS, &mut rng);
        let order_id = format!(
            "{}-{}-{}",
            if rng.gen_bool(0.8) { "CA" } else { "US" },
            date.format("%Y"),
            rng.gen_range(100000..1000000u32)
        );
        let (customer_name, segment) = customers
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| ("Pat Doe".to_string(), "Consumer"));
        let month_first = rng.gen::<f64>() < args.month_first_rate;

        for _ in 0..rng.gen_range(1..=4u32) {
            let (category, items) = CATALOG.choose(&mut rng).copied().unwrap_or(CATALOG[0]);
            let (sub_category, base_price) = items.choose(&mut rng).copied().unwrap_or(items[0]);
            let quantity = rng.gen_range(1..=7u32) as f64;
            let discount = [0.0, 0.0, 0.1, 0.2, 0.3].choose(&mut rng).copied().unwrap_or(0.0);
            let sales = base_price * rng.gen_range(0.2..1.8) * quantity * (1.0 - discount);

            row_id += 1;
            let mut record = OutputRecord {
                row_id,
                order_id: order_id.clone(),
                order_date: format_date(date, month_first),
                customer_name: customer_name.clone(),
                segment: segment.to_string(),
                region: region.to_string(),
                category: category.to_string(),
                sub_category: sub_category.to_string(),
                sales: format!("{:.4}", sales),
            };
            if rng.gen::<f64>() < args.invalid_rate {
                corrupt(&mut record, &mut rng);
                invalid_rows += 1;
            }
            writer.serialize(&record)?;
        }
    }

    writer.flush()?;

    println!("Generation complete!");
    println!("{}", "━".repeat(60));
    println!("Rows written:      {:>8}", row_id);
    println!("Invalid rows:      {:>8}", invalid_rows);
    println!("Output file:       {}", args.output.display());

    Ok(())
}
