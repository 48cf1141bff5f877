//! Calendar period resolution.
//!
//! Turns a user-supplied `(year, month?, week?)` selector into a concrete
//! inclusive date range. All calendar math is pure: no clock reads, and no
//! date-library behavior beyond constructing a day-of-month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while resolving a period selector.
///
/// These are caller-input errors; they map to a 400 at the HTTP boundary
/// and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("invalid month: {0}")]
    InvalidMonth(String),

    #[error("invalid week: {0}")]
    InvalidWeek(String),
}

/// Aggregation window granularity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Week,
    Year,
}

/// Canonical calendar months.
///
/// Selector matching is case-sensitive and exact: `"March"` resolves,
/// `"march"` does not.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Calendar number, 1 (January) through 12 (December).
    pub fn number(self) -> u32 {
        match self {
            Month::January => 1,
            Month::February => 2,
            Month::March => 3,
            Month::April => 4,
            Month::May => 5,
            Month::June => 6,
            Month::July => 7,
            Month::August => 8,
            Month::September => 9,
            Month::October => 10,
            Month::November => 11,
            Month::December => 12,
        }
    }

    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.number() == n)
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved, inclusive calendar date range.
///
/// Constructed per request from the selector and discarded with the
/// response; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl Period {
    /// `true` when `date` falls inside the window (bounds inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `(year, month)`, Gregorian leap years accounted for.
pub fn last_day_of_month(year: i32, month: Month) -> u32 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Week numbers valid for `(year, month)`.
///
/// Week `w` begins on day `(w - 1) * 7 + 1`, so weeks 2..=5 require the
/// month to reach days 8, 15, 22 and 29 respectively. Week 1 always
/// exists.
pub fn available_weeks(year: i32, month: Month) -> Vec<u8> {
    let last = last_day_of_month(year, month);
    (1..=5u8)
        .filter(|w| u32::from(w - 1) * 7 + 1 <= last)
        .collect()
}

/// Resolve a raw selector into a [`Period`].
///
/// Selector shapes: `{year}`, `{year, month}`, `{year, month, week}`.
pub fn resolve(
    year: Option<&str>,
    month: Option<&str>,
    week: Option<&str>,
) -> Result<Period, PeriodError> {
    let year = parse_year(year)?;

    match (month, week) {
        (None, None) => year_period(year),
        (Some(m), None) => month_period(year, parse_month(m)?),
        (Some(m), Some(w)) => week_period(year, parse_month(m)?, parse_week(w)?),
        (None, Some(_)) => Err(PeriodError::InvalidPeriod(
            "a week selector requires a month".to_string(),
        )),
    }
}

/// Jan 1 through Dec 31 of `year`.
pub fn year_period(year: i32) -> Result<Period, PeriodError> {
    Ok(Period {
        start: date(year, Month::January, 1)?,
        end: date(year, Month::December, 31)?,
        granularity: Granularity::Year,
    })
}

/// First through last calendar day of `(year, month)`.
pub fn month_period(year: i32, month: Month) -> Result<Period, PeriodError> {
    Ok(Period {
        start: date(year, month, 1)?,
        end: date(year, month, last_day_of_month(year, month))?,
        granularity: Granularity::Month,
    })
}

/// Week `week` (1..=5) within `(year, month)`.
///
/// The final week is capped at the last day of the month, so week 5 of a
/// 31-day month covers days 29..=31.
pub fn week_period(year: i32, month: Month, week: u8) -> Result<Period, PeriodError> {
    let last = last_day_of_month(year, month);
    let start_day = u32::from(week - 1) * 7 + 1;
    if start_day > last {
        return Err(PeriodError::InvalidWeek(format!(
            "week {week} does not exist in {month} {year}"
        )));
    }
    Ok(Period {
        start: date(year, month, start_day)?,
        end: date(year, month, (start_day + 6).min(last))?,
        granularity: Granularity::Week,
    })
}

fn parse_year(year: Option<&str>) -> Result<i32, PeriodError> {
    let raw = year.ok_or_else(|| PeriodError::InvalidPeriod("year is required".to_string()))?;
    raw.trim()
        .parse()
        .map_err(|_| PeriodError::InvalidPeriod(format!("year must be numeric, got {raw:?}")))
}

fn parse_month(raw: &str) -> Result<Month, PeriodError> {
    Month::from_name(raw)
        .ok_or_else(|| PeriodError::InvalidMonth(format!("{raw:?} is not a month name")))
}

fn parse_week(raw: &str) -> Result<u8, PeriodError> {
    let week: u8 = raw
        .trim()
        .parse()
        .map_err(|_| PeriodError::InvalidWeek(format!("week must be an integer, got {raw:?}")))?;
    if !(1..=5).contains(&week) {
        return Err(PeriodError::InvalidWeek(format!(
            "week must be between 1 and 5, got {week}"
        )));
    }
    Ok(week)
}

fn date(year: i32, month: Month, day: u32) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(year, month.number(), day).ok_or_else(|| {
        PeriodError::InvalidPeriod(format!("no such date: {year}-{:02}-{day:02}", month.number()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_whole_year() {
        let p = resolve(Some("2025"), None, None).unwrap();
        assert_eq!(p.start, ymd(2025, 1, 1));
        assert_eq!(p.end, ymd(2025, 12, 31));
        assert_eq!(p.granularity, Granularity::Year);
    }

    #[test]
    fn resolves_whole_month() {
        let p = resolve(Some("2025"), Some("February"), None).unwrap();
        assert_eq!(p.start, ymd(2025, 2, 1));
        assert_eq!(p.end, ymd(2025, 2, 28));
        assert_eq!(p.granularity, Granularity::Month);
    }

    #[test]
    fn resolves_first_week_of_march() {
        let p = resolve(Some("2025"), Some("March"), Some("1")).unwrap();
        assert_eq!(p.start, ymd(2025, 3, 1));
        assert_eq!(p.end, ymd(2025, 3, 7));
    }

    #[test]
    fn caps_final_week_at_month_end() {
        let p = resolve(Some("2025"), Some("March"), Some("5")).unwrap();
        assert_eq!(p.start, ymd(2025, 3, 29));
        assert_eq!(p.end, ymd(2025, 3, 31));
    }

    #[test]
    fn rejects_missing_or_garbage_year() {
        assert!(matches!(
            resolve(None, None, None),
            Err(PeriodError::InvalidPeriod(_))
        ));
        assert!(matches!(
            resolve(Some("twenty-five"), None, None),
            Err(PeriodError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn month_match_is_case_sensitive() {
        assert!(matches!(
            resolve(Some("2025"), Some("march"), None),
            Err(PeriodError::InvalidMonth(_))
        ));
    }

    #[test]
    fn rejects_week_out_of_range() {
        assert!(matches!(
            resolve(Some("2025"), Some("March"), Some("0")),
            Err(PeriodError::InvalidWeek(_))
        ));
        assert!(matches!(
            resolve(Some("2025"), Some("March"), Some("6")),
            Err(PeriodError::InvalidWeek(_))
        ));
    }

    #[test]
    fn rejects_week_five_in_short_february() {
        assert!(matches!(
            resolve(Some("2023"), Some("February"), Some("5")),
            Err(PeriodError::InvalidWeek(_))
        ));
    }

    #[test]
    fn rejects_week_without_month() {
        assert!(matches!(
            resolve(Some("2025"), None, Some("2")),
            Err(PeriodError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn week_counts_follow_month_length() {
        assert_eq!(available_weeks(2025, Month::March), vec![1, 2, 3, 4, 5]);
        assert_eq!(available_weeks(2025, Month::April), vec![1, 2, 3, 4, 5]);
        assert_eq!(available_weeks(2023, Month::February), vec![1, 2, 3, 4]);
        assert_eq!(available_weeks(2024, Month::February), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn leap_year_rules_are_gregorian() {
        assert_eq!(last_day_of_month(2024, Month::February), 29);
        assert_eq!(last_day_of_month(1900, Month::February), 28);
        assert_eq!(last_day_of_month(2000, Month::February), 29);
    }

    #[test]
    fn period_bounds_are_inclusive() {
        let p = month_period(2025, Month::March).unwrap();
        assert!(p.contains(ymd(2025, 3, 1)));
        assert!(p.contains(ymd(2025, 3, 31)));
        assert!(!p.contains(ymd(2025, 4, 1)));
    }
}
