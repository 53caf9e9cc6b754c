//! Grouped sales aggregates and headline metrics.
//!
//! Every function here is a pure computation over already-normalized
//! records. Grouping keeps first-encounter key order so that ranking ties
//! resolve to the row order of the input.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::error::{ReportError, Result};
use crate::models::SalesRecord;
use crate::normalize::NormalizationReport;

/// Region labels charted in this fixed order.
pub const CANONICAL_REGIONS: [&str; 4] = ["West", "East", "Central", "South"];

/// Length of the ranked sub-category and customer lists.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: f64,
}

/// Ordered key to summed-sales mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aggregate {
    entries: Vec<Entry>,
}

impl Aggregate {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.value)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// Largest `n` entries, descending. Equal values keep their current order.
    pub fn top(mut self, n: usize) -> Aggregate {
        self.entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        self.entries.truncate(n);
        self
    }

    pub fn sorted_by_key(mut self) -> Aggregate {
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));
        self
    }

    /// Each entry as a percentage of the aggregate total.
    pub fn shares(&self) -> Vec<Entry> {
        let total = self.total();
        self.entries
            .iter()
            .map(|e| Entry {
                key: e.key.clone(),
                value: if total == 0.0 { 0.0 } else { e.value / total * 100.0 },
            })
            .collect()
    }
}

impl FromIterator<(String, f64)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Aggregate {
            entries: iter
                .into_iter()
                .map(|(key, value)| Entry { key, value })
                .collect(),
        }
    }
}

/// Sum sales per key, keys in first-encounter order. Rows without a key
/// are left out of the grouping.
pub fn group_sum<'a, F>(records: &'a [SalesRecord], key: F) -> Aggregate
where
    F: Fn(&'a SalesRecord) -> Option<&'a str>,
{
    let mut sums: IndexMap<&str, f64> = IndexMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *sums.entry(k).or_insert(0.0) += record.sales;
        }
    }
    sums.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Sales per region, split into the canonical four and everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionBreakdown {
    /// All four canonical regions in canonical order; absent ones are zero.
    pub canonical: Aggregate,
    /// Labels outside the canonical set, in encounter order.
    pub unrecognized: Aggregate,
    /// Region with the highest observed sales.
    pub top_region: Option<String>,
}

impl RegionBreakdown {
    pub fn total(&self) -> f64 {
        self.canonical.total() + self.unrecognized.total()
    }
}

pub fn sales_by_region(records: &[SalesRecord]) -> RegionBreakdown {
    let observed = group_sum(records, |r| r.region.as_deref());

    let canonical: Aggregate = CANONICAL_REGIONS
        .iter()
        .map(|region| (region.to_string(), observed.get(region).unwrap_or(0.0)))
        .collect();
    let unrecognized: Aggregate = observed
        .entries()
        .iter()
        .filter(|e| !CANONICAL_REGIONS.contains(&e.key.as_str()))
        .map(|e| (e.key.clone(), e.value))
        .collect();

    for entry in unrecognized.entries() {
        warn!(
            "Region '{}' is not one of {:?}; {:.2} in sales excluded from the region chart",
            entry.key, CANONICAL_REGIONS, entry.value
        );
    }

    // Only regions that actually occur compete; canonical ones first so
    // that ties resolve in canonical order.
    let mut top_region: Option<&Entry> = None;
    let candidates = canonical
        .entries()
        .iter()
        .filter(|e| observed.get(&e.key).is_some())
        .chain(unrecognized.entries());
    for entry in candidates {
        if top_region.map_or(true, |best| entry.value > best.value) {
            top_region = Some(entry);
        }
    }
    let top_region = top_region.map(|e| e.key.clone());

    RegionBreakdown {
        canonical,
        unrecognized,
        top_region,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearQuarters {
    pub year: i32,
    /// Sales for Q1..Q4; quarters without orders are zero.
    pub quarters: [f64; 4],
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuarterlySales {
    pub years: Vec<YearQuarters>,
}

impl QuarterlySales {
    pub fn grand_total(&self) -> f64 {
        self.years.iter().map(|y| y.total).sum()
    }
}

/// Sales by (year, quarter), every present year reindexed over Q1..Q4.
pub fn sales_by_quarter(records: &[SalesRecord]) -> QuarterlySales {
    let mut by_year: BTreeMap<i32, [f64; 4]> = BTreeMap::new();
    for record in records {
        let quarters = by_year.entry(record.year).or_insert([0.0; 4]);
        quarters[(record.quarter - 1) as usize] += record.sales;
    }

    QuarterlySales {
        years: by_year
            .into_iter()
            .map(|(year, quarters)| YearQuarters {
                year,
                quarters,
                total: quarters.iter().sum(),
            })
            .collect(),
    }
}

/// Headline figures shown on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarMetrics {
    pub total_sales: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
    /// `None` when no retained row names a region.
    pub top_region: Option<String>,
}

impl ScalarMetrics {
    pub fn compute(records: &[SalesRecord], regions: &RegionBreakdown) -> Result<ScalarMetrics> {
        let total_sales: f64 = records.iter().map(|r| r.sales).sum();
        let total_orders = records
            .iter()
            .filter_map(|r| r.order_id.as_deref())
            .collect::<HashSet<_>>()
            .len();
        if total_orders == 0 {
            return Err(ReportError::NoOrders);
        }
        Ok(ScalarMetrics {
            total_sales,
            total_orders,
            average_order_value: total_sales / total_orders as f64,
            top_region: regions.top_region.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn of(records: &[SalesRecord]) -> Option<DateRange> {
        let first = records.iter().map(|r| r.order_date).min()?;
        let last = records.iter().map(|r| r.order_date).max()?;
        Some(DateRange { first, last })
    }
}

/// Everything a rendering layer needs, without re-deriving any aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub normalization: NormalizationReport,
    pub metrics: ScalarMetrics,
    pub date_range: Option<DateRange>,
    pub by_region: RegionBreakdown,
    pub by_quarter: QuarterlySales,
    pub by_category: Aggregate,
    pub top_sub_categories: Aggregate,
    pub by_segment: Aggregate,
    pub top_customers: Aggregate,
}

/// Compute every aggregate over the derived dataset.
pub fn summarize(records: &[SalesRecord], normalization: NormalizationReport) -> Result<SalesSummary> {
    let by_region = sales_by_region(records);
    let metrics = ScalarMetrics::compute(records, &by_region)?;

    Ok(SalesSummary {
        normalization,
        metrics,
        date_range: DateRange::of(records),
        by_quarter: sales_by_quarter(records),
        by_category: group_sum(records, |r| r.category.as_deref()).sorted_by_key(),
        top_sub_categories: group_sum(records, |r| r.sub_category.as_deref()).top(TOP_N),
        by_segment: group_sum(records, |r| r.segment.as_deref()).sorted_by_key(),
        top_customers: group_sum(records, |r| r.customer_name.as_deref()).top(TOP_N),
        by_region,
    })
}
