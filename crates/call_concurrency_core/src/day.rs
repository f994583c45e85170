//! UTC calendar days and their millisecond windows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::Call;

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A UTC calendar date, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// The UTC day containing `timestamp_ms`, or `None` outside chrono's range.
    pub fn containing(timestamp_ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|instant| Self(instant.date_naive()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// `[00:00:00.000Z, 23:59:59.999Z]` of this day.
    pub fn window(self) -> DayWindow {
        let start_ms = self.0.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        DayWindow {
            start_ms,
            end_ms: start_ms + MS_PER_DAY - 1,
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start_ms: i64,
    /// Inclusive last millisecond of the day.
    pub end_ms: i64,
}

impl DayWindow {
    /// Strict overlap: touching either boundary does not count.
    pub fn overlaps(&self, call: &Call) -> bool {
        call.start_timestamp < self.end_ms && call.end_timestamp > self.start_ms
    }
}
