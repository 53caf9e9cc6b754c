use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Header names the input file must provide, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Order ID",
    "Order Date",
    "Sales",
    "Region",
    "Category",
    "Sub-Category",
    "Segment",
    "Customer Name",
];

/// Raw record from CSV ingestion. Every field stays textual until
/// normalization decides whether the row is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Sales")]
    pub sales: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sub-Category")]
    pub sub_category: String,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
}

/// A row that survived normalization: valid date, finite sales amount.
/// Grouping keys are `None` where the cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub order_id: Option<String>,
    pub order_date: NaiveDate,
    pub sales: f64,
    pub region: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub segment: Option<String>,
    pub customer_name: Option<String>,
}

/// Sales transaction with its calendar fields derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_id: Option<String>,
    pub order_date: NaiveDate,
    pub year: i32,
    /// Calendar quarter, 1 = Jan-Mar through 4 = Oct-Dec.
    pub quarter: u32,
    pub sales: f64,
    pub region: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub segment: Option<String>,
    pub customer_name: Option<String>,
}

/// Calendar quarter of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

impl From<NormalizedRecord> for SalesRecord {
    fn from(record: NormalizedRecord) -> Self {
        SalesRecord {
            year: record.order_date.year(),
            quarter: quarter_of(record.order_date),
            order_id: record.order_id,
            order_date: record.order_date,
            sales: record.sales,
            region: record.region,
            category: record.category,
            sub_category: record.sub_category,
            segment: record.segment,
            customer_name: record.customer_name,
        }
    }
}

/// Derive year and quarter for every normalized record, preserving order.
pub fn derive(records: Vec<NormalizedRecord>) -> Vec<SalesRecord> {
    records.into_iter().map(SalesRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(date: NaiveDate) -> NormalizedRecord {
        NormalizedRecord {
            order_id: Some("CA-2016-1".to_string()),
            order_date: date,
            sales: 10.0,
            region: Some("West".to_string()),
            category: Some("Furniture".to_string()),
            sub_category: Some("Chairs".to_string()),
            segment: Some("Consumer".to_string()),
            customer_name: Some("Claire Gute".to_string()),
        }
    }

    #[test]
    fn test_quarter_boundaries() {
        let expected = [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4];
        for (month, quarter) in (1..=12).zip(expected) {
            let date = NaiveDate::from_ymd_opt(2017, month, 15).unwrap();
            assert_eq!(quarter_of(date), quarter, "month {}", month);
        }
    }

    #[test]
    fn test_derive_sets_year_and_quarter() {
        let date = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap();
        let derived = derive(vec![normalized(date)]);
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].year, 2016);
        assert_eq!(derived[0].quarter, 1);
        assert_eq!(derived[0].order_date, date);
    }
}
