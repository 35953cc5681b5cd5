// Dweve SDMX - Structural Metadata Engine
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Time period parsing.
//!
//! Accepts ISO dates (`2023`, `2023-01`, `2023-01-15`) and SDMX reporting
//! periods (`2023-A1`, `2023-S1`, `2023-Q1`, `2023-T1`, `2023-M01`,
//! `2023-W01`, `2023-D001`) and turns them into inclusive calendar ranges.

use crate::error::{Result, ValidationError};
use crate::model::TimeRange;
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>\d{4})(?:-(?:(?P<month>0[1-9]|1[0-2])(?:-(?P<day>0[1-9]|[12]\d|3[01]))?|(?P<kind>[ASQTMWD])(?P<num>\d{1,3})))?$",
    )
    .expect("period pattern is valid")
});

/// Frequency implied by a period's syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frequency {
    /// `A`
    Annual,
    /// `S`
    Semester,
    /// `T` (four-month periods)
    Trimester,
    /// `Q`
    Quarterly,
    /// `M`
    Monthly,
    /// `W`
    Weekly,
    /// `D`
    Daily,
}

impl Frequency {
    /// SDMX frequency code.
    pub fn code(&self) -> char {
        match self {
            Frequency::Annual => 'A',
            Frequency::Semester => 'S',
            Frequency::Trimester => 'T',
            Frequency::Quarterly => 'Q',
            Frequency::Monthly => 'M',
            Frequency::Weekly => 'W',
            Frequency::Daily => 'D',
        }
    }
}

/// Inclusive calendar range covered by a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
    /// Implied frequency.
    pub frequency: Frequency,
}

/// How a query period relates to an availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlap {
    /// The query lies entirely inside the window.
    Full,
    /// The query and the window intersect.
    Partial,
    /// Disjoint.
    None,
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

fn month_span(year: i32, first: u32, count: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, first, 1)?;
    let end = last_day_of_month(year, first + count - 1)?;
    Some((start, end))
}

/// Parse a period into its calendar range.
///
/// A time-of-day suffix (`2020-01-01T00:00:00`) is ignored, so constraint
/// bounds can be fed in directly.
pub fn parse_period(period: &str) -> Result<PeriodRange> {
    let invalid = || ValidationError::InvalidPeriod(period.to_string());
    let trimmed = period.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    let caps = PERIOD_RE.captures(date_part).ok_or_else(invalid)?;

    let year: i32 = caps["year"].parse().map_err(|_| invalid())?;
    let number = |name: &str| -> Option<u32> { caps.name(name).and_then(|m| m.as_str().parse().ok()) };

    let (start, end, frequency) = if let Some(kind) = caps.name("kind") {
        let n = number("num").ok_or_else(invalid)?;
        let width = caps.name("num").map_or(0, |m| m.as_str().len());
        let span = match (kind.as_str(), width, n) {
            ("A", 1, 1) => month_span(year, 1, 12).map(|(s, e)| (s, e, Frequency::Annual)),
            ("S", 1, 1..=2) => month_span(year, (n - 1) * 6 + 1, 6).map(|(s, e)| (s, e, Frequency::Semester)),
            ("T", 1, 1..=3) => month_span(year, (n - 1) * 4 + 1, 4).map(|(s, e)| (s, e, Frequency::Trimester)),
            ("Q", 1, 1..=4) => month_span(year, (n - 1) * 3 + 1, 3).map(|(s, e)| (s, e, Frequency::Quarterly)),
            ("M", 2, 1..=12) => month_span(year, n, 1).map(|(s, e)| (s, e, Frequency::Monthly)),
            ("W", 2, 1..=53) => {
                let monday = NaiveDate::from_isoywd_opt(year, n, Weekday::Mon);
                let sunday = NaiveDate::from_isoywd_opt(year, n, Weekday::Sun);
                monday.zip(sunday).map(|(s, e)| (s, e, Frequency::Weekly))
            }
            ("D", 3, 1..=366) => NaiveDate::from_yo_opt(year, n).map(|d| (d, d, Frequency::Daily)),
            _ => None,
        };
        span.ok_or_else(invalid)?
    } else if let Some(month) = number("month") {
        match number("day") {
            Some(day) => {
                let d = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
                (d, d, Frequency::Daily)
            }
            None => {
                let (s, e) = month_span(year, month, 1).ok_or_else(invalid)?;
                (s, e, Frequency::Monthly)
            }
        }
    } else {
        let (s, e) = month_span(year, 1, 12).ok_or_else(invalid)?;
        (s, e, Frequency::Annual)
    };

    Ok(PeriodRange {
        start,
        end,
        frequency,
    })
}

/// Order two periods by the first day they cover.
///
/// `2010-Q1` and `2010` both start on 2010-01-01 and compare equal; either
/// side that is not a period falls back to text order.
pub fn compare_starts(a: &str, b: &str) -> Ordering {
    match (parse_period(a), parse_period(b)) {
        (Ok(x), Ok(y)) => x.start.cmp(&y.start),
        _ => a.cmp(b),
    }
}

/// Order two periods by the last day they cover, so `2010` (ending
/// 2010-12-31) sorts after `2010-06`.
pub fn compare_ends(a: &str, b: &str) -> Ordering {
    match (parse_period(a), parse_period(b)) {
        (Ok(x), Ok(y)) => x.end.cmp(&y.end),
        _ => a.cmp(b),
    }
}

/// True if `period` is a recognised period string.
pub fn is_valid_period(period: &str) -> bool {
    parse_period(period).is_ok()
}

/// Validate `period`, returning it trimmed.
pub fn validate_period(period: &str) -> Result<String> {
    parse_period(period).map(|_| period.trim().to_string())
}

/// Check that `start` does not begin after `end` finishes.
///
/// Bounds are inclusive periods, so `2020-Q4..2020` is valid while
/// `2023..2018` is not.
pub fn check_bounds(start: &str, end: &str) -> Result<()> {
    if parse_period(start)?.start > parse_period(end)?.end {
        return Err(ValidationError::InvertedPeriod {
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        });
    }
    Ok(())
}

/// Calendar span of an availability window; open ends stay `None`.
pub fn time_range_bounds(range: &TimeRange) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = range.start.as_deref().map(parse_period).transpose()?.map(|p| p.start);
    let end = range.end.as_deref().map(parse_period).transpose()?.map(|p| p.end);
    Ok((start, end))
}

/// Classify a query `[start, end]` against an availability window.
///
/// A missing query bound defaults to the other bound, so `start` alone
/// asks about that single period. Open window ends are unbounded.
pub fn classify_overlap(
    start: Option<&str>,
    end: Option<&str>,
    available: &TimeRange,
) -> Result<Overlap> {
    let (query_start, query_end) = match (start, end) {
        (Some(s), Some(e)) => (parse_period(s)?.start, parse_period(e)?.end),
        (Some(s), None) => {
            let p = parse_period(s)?;
            (p.start, p.end)
        }
        (None, Some(e)) => {
            let p = parse_period(e)?;
            (p.start, p.end)
        }
        (None, None) => return Ok(Overlap::Full),
    };
    let (window_start, window_end) = time_range_bounds(available)?;
    let window_start = window_start.unwrap_or(NaiveDate::MIN);
    let window_end = window_end.unwrap_or(NaiveDate::MAX);

    if query_end < window_start || query_start > window_end {
        Ok(Overlap::None)
    } else if query_start >= window_start && query_end <= window_end {
        Ok(Overlap::Full)
    } else {
        Ok(Overlap::Partial)
    }
}

/// Year of a period, for coarse comparisons.
pub fn period_year(period: &str) -> Result<i32> {
    parse_period(period).map(|p| p.start.year())
}
