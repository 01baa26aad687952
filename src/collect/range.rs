//! Inclusive calendar date ranges and their UTC epoch bounds.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};

/// Date format used everywhere in configuration and output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SECONDS_PER_DAY: i64 = 86_400;

/// An inclusive range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::ConfigValidation {
                field: "start_date".to_string(),
                message: format!("Start date {} is after end date {}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date("start_date", start)?, parse_date("end_date", end)?)
    }

    /// 00:00:00 UTC of the first day.
    pub fn start_epoch(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// 23:59:59 UTC of the last day.
    pub fn end_epoch(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp() + SECONDS_PER_DAY - 1
    }

    /// Whether a Unix timestamp falls inside the range, both ends inclusive.
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start_epoch() <= timestamp && timestamp <= self.end_epoch()
    }

    /// Days between start and end (0 for a single-day range).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days covered.
    pub fn total_days(&self) -> i64 {
        self.span_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    if value.trim().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a YYYY-MM-DD date: {}", value, e),
    })
}
