//! Normalization: date coercion and removal of unusable rows.

use serde::Serialize;
use tracing::{info, warn};

use crate::dates::{parse_order_date, DateFormat, ParsedDate};
use crate::ingest::RawDataset;
use crate::models::{CsvRecord, NormalizedRecord};

/// What happened to the rows of one dataset during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    /// Rows seen, including malformed ones.
    pub rows_read: usize,
    pub malformed_rows: usize,
    pub invalid_dates: usize,
    pub invalid_sales: usize,
    /// Retained rows whose date would read differently month-first.
    pub ambiguous_dates: usize,
    /// Retained rows that only parsed as MM/DD/YYYY.
    pub month_first_dates: usize,
    pub retained: usize,
}

impl NormalizationReport {
    pub fn dropped(&self) -> usize {
        self.malformed_rows + self.invalid_dates + self.invalid_sales
    }
}

/// Why a single row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    InvalidDate,
    InvalidSales,
}

/// Parse a sales amount; empty, non-numeric and non-finite values are missing.
pub fn parse_sales(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A blank grouping cell is a missing key, not an empty-string key.
pub fn key_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CsvRecord {
    /// Coerce a raw row into a normalized record, returning the date parse
    /// alongside it.
    pub fn normalize(&self) -> Result<(NormalizedRecord, ParsedDate), RowRejection> {
        let parsed = parse_order_date(&self.order_date).ok_or(RowRejection::InvalidDate)?;
        let sales = parse_sales(&self.sales).ok_or(RowRejection::InvalidSales)?;

        Ok((
            NormalizedRecord {
                order_id: key_field(&self.order_id),
                order_date: parsed.date,
                sales,
                region: key_field(&self.region),
                category: key_field(&self.category),
                sub_category: key_field(&self.sub_category),
                segment: key_field(&self.segment),
                customer_name: key_field(&self.customer_name),
            },
            parsed,
        ))
    }
}

/// Normalize every row, dropping those without a valid date or sales value.
pub fn normalize(dataset: &RawDataset) -> (Vec<NormalizedRecord>, NormalizationReport) {
    let mut report = NormalizationReport {
        rows_read: dataset.rows.len() + dataset.malformed_rows,
        malformed_rows: dataset.malformed_rows,
        ..Default::default()
    };

    let mut records = Vec::with_capacity(dataset.rows.len());
    for row in &dataset.rows {
        match row.normalize() {
            Ok((record, parsed)) => {
                if parsed.ambiguous {
                    report.ambiguous_dates += 1;
                }
                if parsed.format == DateFormat::MonthFirst {
                    report.month_first_dates += 1;
                }
                records.push(record);
            }
            Err(RowRejection::InvalidDate) => report.invalid_dates += 1,
            Err(RowRejection::InvalidSales) => report.invalid_sales += 1,
        }
    }
    report.retained = records.len();

    info!(
        "Normalized {} rows: {} retained, {} dropped",
        report.rows_read,
        report.retained,
        report.dropped()
    );
    if report.dropped() > 0 {
        warn!(
            "Dropped rows: {} malformed, {} invalid date, {} invalid sales",
            report.malformed_rows, report.invalid_dates, report.invalid_sales
        );
    }
    if report.month_first_dates > 0 {
        info!("{} order dates parsed month-first", report.month_first_dates);
    }
    if report.ambiguous_dates > 0 {
        warn!(
            "{} order dates were ambiguous and read as day-first",
            report.ambiguous_dates
        );
    }

    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_dataset;
    use chrono::NaiveDate;

    const HEADER: &str = "Order ID,Order Date,Sales,Region,Category,Sub-Category,Segment,Customer Name";

    fn dataset(rows: &[&str]) -> RawDataset {
        let csv = format!("{HEADER}\n{}\n", rows.join("\n"));
        read_dataset(csv.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn test_parse_sales() {
        assert_eq!(parse_sales(" 261.96 "), Some(261.96));
        assert_eq!(parse_sales("-3.5"), Some(-3.5));
        assert_eq!(parse_sales(""), None);
        assert_eq!(parse_sales("n/a"), None);
        assert_eq!(parse_sales("NaN"), None);
        assert_eq!(parse_sales("inf"), None);
    }

    #[test]
    fn test_blank_keys_become_missing() {
        let raw = dataset(&[" ,08/11/2016,500,,Furniture,  ,Consumer,"]);
        let (records, report) = normalize(&raw);
        assert_eq!(report.retained, 1);
        let record = &records[0];
        assert_eq!(record.order_id, None);
        assert_eq!(record.region, None);
        assert_eq!(record.sub_category, None);
        assert_eq!(record.customer_name, None);
        assert_eq!(record.category.as_deref(), Some("Furniture"));
        assert_eq!(record.sales, 500.0);
    }

    #[test]
    fn test_invalid_date_row_dropped() {
        let raw = dataset(&[
            "CA-1,01/02/2016,10,West,Furniture,Chairs,Consumer,Ann",
            "CA-2,99/99/9999,20,West,Furniture,Chairs,Consumer,Ann",
        ]);
        let (records, report) = normalize(&raw);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_date, NaiveDate::from_ymd_opt(2016, 2, 1).unwrap());
        assert_eq!(report.invalid_dates, 1);
        assert_eq!(report.retained, 1);
        assert_eq!(report.dropped(), 1);
    }

    #[test]
    fn test_missing_sales_dropped() {
        let raw = dataset(&[
            "CA-1,08/11/2016,,West,Furniture,Chairs,Consumer,Ann",
            "CA-2,08/11/2016,abc,West,Furniture,Chairs,Consumer,Ann",
            "CA-3,08/11/2016,5,West,Furniture,Chairs,Consumer,Ann",
        ]);
        let (records, report) = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_id.as_deref(), Some("CA-3"));
        assert_eq!(report.invalid_sales, 2);
    }

    #[test]
    fn test_report_counts_ambiguous_and_malformed() {
        let raw = dataset(&[
            "CA-1,03/04/2016,10,West,Furniture,Chairs,Consumer,Ann",
            "CA-2,12/31/2016,10,West,Furniture,Chairs,Consumer,Ann",
            "CA-3,broken",
        ]);
        let (records, report) = normalize(&raw);
        assert_eq!(records.len(), 2);
        assert_eq!(
            report,
            NormalizationReport {
                rows_read: 3,
                malformed_rows: 1,
                invalid_dates: 0,
                invalid_sales: 0,
                ambiguous_dates: 1,
                month_first_dates: 1,
                retained: 2,
            }
        );
        assert_eq!(records[0].order_date, NaiveDate::from_ymd_opt(2016, 4, 3).unwrap());
    }
}
