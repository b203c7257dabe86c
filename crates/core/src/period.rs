//! Date and period expression resolution.
//!
//! Turns free-form expressions ("today", "last week", "January 2024",
//! "02/01/2024") into concrete dates or inclusive date ranges. The
//! grammar is a fixed token/phrase table plus an ordered list of
//! absolute formats; anything outside it fails with
//! [`CoreError::Parse`] carrying the original input.
//!
//! The plain entry points resolve relative expressions against the
//! wall-clock date, so their results change as the process clock moves.
//! Tests (and anything else that needs determinism) use the `*_with`
//! variants, which take `today` explicitly.

use chrono::{Datelike, Days, Duration, Local, Months, NaiveDate};

use crate::error::CoreError;

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Absolute date formats accepted by [`parse_date`], tried in order.
///
/// The first matching format wins, so `MM/DD/YYYY` shadows
/// `DD/MM/YYYY` whenever the day value is 12 or less: "02/01/2024"
/// resolves to February 1, not January 2. This ambiguity is inherent
/// to accepting both slash orders and is deliberately left as-is.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Resolve a single-date expression against the wall clock.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    parse_date_with(input, today())
}

/// Resolve a single-date expression against an explicit `today`.
pub fn parse_date_with(input: &str, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    let expr = input.trim().to_lowercase();

    match expr.as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Days::new(1)),
        "tomorrow" => return Ok(today + Days::new(1)),
        _ => {}
    }

    for (prefix, offset) in [("this ", 0i32), ("last ", -1), ("next ", 1)] {
        if let Some(unit) = expr.strip_prefix(prefix) {
            return relative_start(unit, offset, today).ok_or_else(|| parse_error(input));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&expr, format) {
            return Ok(date);
        }
    }

    Err(parse_error(input))
}

/// Resolve a period expression against the wall clock.
pub fn parse_period(input: &str) -> Result<DateRange, CoreError> {
    parse_period_with(input, today())
}

/// Resolve a period expression against an explicit `today`.
///
/// Month periods span the full calendar month. Week periods span seven
/// days from the computed Monday; the five-weekday subset used when
/// expanding a phrase into individual entry dates is
/// [`weekday_dates`].
pub fn parse_period_with(input: &str, today: NaiveDate) -> Result<DateRange, CoreError> {
    let expr = input.trim().to_lowercase();

    let range = match expr.as_str() {
        "this month" | "current month" => month_range(today.year(), today.month()),
        "last month" => today
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(1)))
            .and_then(|prev| month_range(prev.year(), prev.month())),
        "this week" => Some(week_range(monday_of(today, 0))),
        "last week" => Some(week_range(monday_of(today, -1))),
        _ => month_year_range(&expr),
    };

    range.ok_or_else(|| parse_error(input))
}

/// The five weekdays (Monday through Friday) of the week `week_offset`
/// weeks away from `today`. This is the date set a natural-language
/// phrase like "this week" expands to when logging entries, where
/// weekends are excluded.
pub fn weekday_dates(today: NaiveDate, week_offset: i32) -> Vec<NaiveDate> {
    let monday = monday_of(today, week_offset);
    (0..5).map(|i| monday + Days::new(i)).collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_error(input: &str) -> CoreError {
    CoreError::Parse {
        input: input.to_string(),
    }
}

/// Start of the week or month `offset` units away from `today`.
fn relative_start(unit: &str, offset: i32, today: NaiveDate) -> Option<NaiveDate> {
    if unit.contains("week") {
        return Some(monday_of(today, offset));
    }
    if unit.contains("month") {
        let first = today.with_day(1)?;
        return if offset >= 0 {
            first.checked_add_months(Months::new(offset as u32))
        } else {
            first.checked_sub_months(Months::new(offset.unsigned_abs()))
        };
    }
    None
}

/// Monday of the week `offset` weeks away from `today`.
///
/// Weeks are Monday-aligned: `number_from_monday` maps Monday to 1 and
/// Sunday to 7, so a Sunday belongs to the week it ends.
fn monday_of(today: NaiveDate, offset: i32) -> NaiveDate {
    let back = i64::from(today.weekday().number_from_monday()) - 1;
    today - Duration::days(back) + Duration::days(i64::from(offset) * 7)
}

/// Full calendar month: day 1 through the last day, computed as the
/// first of the next month minus one day.
fn month_range(year: i32, month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = start.checked_add_months(Months::new(1))?;
    Some(DateRange {
        start,
        end: next - Days::new(1),
    })
}

/// Seven days starting from `monday`.
fn week_range(monday: NaiveDate) -> DateRange {
    DateRange {
        start: monday,
        end: monday + Days::new(6),
    }
}

/// "`<month-name> <4-digit-year>`", e.g. "January 2024" or "jan 2024".
fn month_year_range(expr: &str) -> Option<DateRange> {
    let mut parts = expr.split_whitespace();
    let month = month_from_name(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1000..=9999).contains(&year) {
        return None;
    }
    month_range(year, month)
}

/// Month name/abbreviation table. Input is already lowercased.
fn month_from_name(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
