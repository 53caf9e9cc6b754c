//! Superstore sales executive dashboard
//!
//! Reads a Superstore-style sales CSV and writes a self-contained, tabbed
//! HTML report with headline metrics and embedded charts.
//!
//! Usage:
//!   superstore_report [INPUT] [--output <PATH>] [--json <PATH>] [--no-open]
//!
//! When INPUT is omitted the path is asked for interactively.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use superstore_dashboard::{output, pipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build the Superstore executive dashboard from a sales CSV
#[derive(Parser, Debug)]
#[command(name = "superstore_report")]
#[command(about = "Generate a tabbed HTML sales dashboard from a Superstore CSV")]
struct Args {
    /// Input CSV path (prompted for when omitted)
    input: Option<PathBuf>,

    /// Output HTML path [default: ~/Downloads/Superstore_Executive_Dashboard.html]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write the computed aggregates as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Do not open the report after writing it
    #[arg(long)]
    no_open: bool,
}

fn prompt_for_input() -> Result<PathBuf> {
    print!("Please drag and drop your train.csv file here: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read input path")?;
    Ok(output::clean_prompt_path(&answer))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("Superstore Executive Dashboard");
    let input = match args.input {
        Some(path) => path,
        None => prompt_for_input()?,
    };

    info!("Loading data from {}", input.display());
    let summary = pipeline::analyze_file(&input)
        .with_context(|| format!("failed to analyze {}", input.display()))?;

    let html = pipeline::build_dashboard(&summary, Local::now().date_naive())?;
    let output_path = args.output.unwrap_or_else(output::default_output_path);
    output::write_report(&output_path, &html)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    if let Some(json_path) = &args.json {
        let json = serde_json::to_string_pretty(&summary)?;
        output::write_report(json_path, &json)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
    }

    if !args.no_open {
        output::open_in_default_app(&output_path);
    }

    println!("\nExecutive dashboard generated successfully!");
    println!("Saved to: {}", output_path.display());

    Ok(())
}
