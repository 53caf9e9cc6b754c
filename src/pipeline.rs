//! Ingestion → normalization → derivation → aggregation, composed.

use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{summarize, SalesSummary};
use crate::charts::render_charts;
use crate::error::Result;
use crate::format::{format_count, format_currency};
use crate::html::render_dashboard;
use crate::ingest::{load_dataset, RawDataset};
use crate::models::derive;
use crate::normalize::normalize;

/// Aggregate an already ingested dataset.
pub fn analyze(dataset: &RawDataset) -> Result<SalesSummary> {
    let (normalized, report) = normalize(dataset);
    let records = derive(normalized);
    let summary = summarize(&records, report)?;

    info!(
        "Analysis complete: {} in sales across {} orders",
        format_currency(summary.metrics.total_sales),
        format_count(summary.metrics.total_orders)
    );
    Ok(summary)
}

pub fn analyze_file(path: impl AsRef<Path>) -> Result<SalesSummary> {
    analyze(&load_dataset(path)?)
}

/// Render charts and assemble the HTML document for a summary.
pub fn build_dashboard(summary: &SalesSummary, generated_on: NaiveDate) -> Result<String> {
    let charts = render_charts(summary)?;
    Ok(render_dashboard(summary, &charts, generated_on))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::ingest::read_dataset;
    use std::fs;

    const SAMPLE: &str = "\
Row ID,Order ID,Order Date,Ship Date,Ship Mode,Customer ID,Customer Name,Segment,Country,City,State,Postal Code,Region,Product ID,Category,Sub-Category,Product Name,Sales
1,CA-2017-152156,08/11/2017,11/11/2017,Second Class,CG-12520,Claire Gute,Consumer,United States,Henderson,Kentucky,42420,South,FUR-BO-10001798,Furniture,Bookcases,\"Bush Somerset Collection Bookcase\",261.96
2,CA-2017-152156,08/11/2017,11/11/2017,Second Class,CG-12520,Claire Gute,Consumer,United States,Henderson,Kentucky,42420,South,FUR-CH-10000454,Furniture,Chairs,\"Hon Deluxe Fabric Upholstered Stacking Chairs, Rounded Back\",731.94
3,CA-2017-138688,12/06/2017,16/06/2017,Second Class,DV-13045,Darrin Van Huff,Corporate,United States,Los Angeles,California,90036,West,OFF-LA-10000240,Office Supplies,Labels,\"Self-Adhesive Address Labels for Typewriters by Universal\",14.62
4,US-2016-108966,11/22/2016,11/26/2016,Standard Class,SO-20335,Sean O'Donnell,Consumer,United States,Fort Lauderdale,Florida,33311,South,FUR-TA-10000577,Furniture,Tables,Bretford CR4500 Series Slim Rectangular Table,957.5775
5,US-2016-108967,99/99/9999,11/26/2016,Standard Class,SO-20335,Sean O'Donnell,Consumer,United States,Fort Lauderdale,Florida,33311,South,OFF-ST-10000760,Office Supplies,Storage,Eldon Fold 'N Roll Cart System,22.368
";

    #[test]
    fn test_analyze_sample() {
        let raw = read_dataset(SAMPLE.as_bytes(), "train.csv").unwrap();
        let summary = analyze(&raw).unwrap();

        assert_eq!(summary.normalization.rows_read, 5);
        assert_eq!(summary.normalization.invalid_dates, 1);
        assert_eq!(summary.metrics.total_orders, 3);
        assert!((summary.metrics.total_sales - 1966.0975).abs() < 1e-9);
        assert_eq!(summary.metrics.top_region.as_deref(), Some("South"));
        assert_eq!(summary.by_region.canonical.get("East"), Some(0.0));
        assert_eq!(summary.by_quarter.years.len(), 2);
        assert_eq!(summary.by_quarter.years[0].year, 2016);
        assert_eq!(summary.by_quarter.years[1].quarters[1], 14.62);
        assert_eq!(summary.top_customers.entries()[0].key, "Claire Gute");
    }

    #[test]
    fn test_blank_key_cells_do_not_form_groups() {
        let csv = "Order ID,Order Date,Sales,Region,Category,Sub-Category,Segment,Customer Name\n\
                   CA-1,08/11/2016,100,West,Furniture,Chairs,Consumer,Ann\n\
                   ,09/11/2016,500,,Furniture,Chairs,Consumer,\n";
        let raw = read_dataset(csv.as_bytes(), "x.csv").unwrap();
        let summary = analyze(&raw).unwrap();

        assert_eq!(summary.metrics.total_orders, 1);
        assert!((summary.metrics.total_sales - 600.0).abs() < 1e-9);
        assert!((summary.metrics.average_order_value - 600.0).abs() < 1e-9);
        assert_eq!(summary.metrics.top_region.as_deref(), Some("West"));
        assert!(summary.by_region.unrecognized.is_empty());
        assert_eq!(summary.top_customers.entries()[0].key, "Ann");
        assert_eq!(summary.top_customers.len(), 1);
    }

    #[test]
    fn test_all_rows_invalid_is_no_orders() {
        let csv = "Order ID,Order Date,Sales,Region,Category,Sub-Category,Segment,Customer Name\n\
                   CA-1,99/99/9999,10,West,Furniture,Chairs,Consumer,Ann\n";
        let raw = read_dataset(csv.as_bytes(), "x.csv").unwrap();
        assert!(matches!(analyze(&raw), Err(ReportError::NoOrders)));
    }

    #[test]
    fn test_file_to_dashboard() {
        let path = std::env::temp_dir().join(format!("superstore-pipeline-{}.csv", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();
        let summary = analyze_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let html = build_dashboard(&summary, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("data:image/png;base64,iVBORw0KGgo").count(), 3);
        assert!(html.contains("Generated on January 02, 2024"));
    }
}
