//! Order-date parsing as an ordered chain of format strategies.

use chrono::NaiveDate;

/// Textual date layouts accepted for the order date, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// DD/MM/YYYY
    DayFirst,
    /// MM/DD/YYYY
    MonthFirst,
}

impl DateFormat {
    pub const CHAIN: [DateFormat; 2] = [DateFormat::DayFirst, DateFormat::MonthFirst];

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayFirst => "%d/%m/%Y",
            DateFormat::MonthFirst => "%m/%d/%Y",
        }
    }

    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, self.pattern()).ok()
    }
}

/// Result of running a raw value through the format chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub format: DateFormat,
    /// Another strategy further down the chain would have produced a
    /// different date from the same text, e.g. "03/04/2016".
    pub ambiguous: bool,
}

/// Parse an order date, first matching strategy wins.
///
/// Returns `None` when no strategy accepts the value; the caller treats
/// that as a missing date.
pub fn parse_order_date(raw: &str) -> Option<ParsedDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut chain = DateFormat::CHAIN.iter().copied();
    let (format, date) = chain.by_ref().find_map(|f| f.parse(raw).map(|d| (f, d)))?;
    let ambiguous = chain.any(|f| f.parse(raw).is_some_and(|other| other != date));

    Some(ParsedDate {
        date,
        format,
        ambiguous,
    })
}
