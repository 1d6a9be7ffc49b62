//! Month and weekday selections applied by the loader.

use chrono::Weekday;
use serde::Serialize;
use std::fmt;

use crate::dataset::weekday_name;
use crate::error::{Error, Result};

pub const ALL: &str = "all";

/// Keeps every trip, or only those started in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    All,
    /// 1-based calendar month.
    Month(u32),
}

impl MonthFilter {
    /// Parses "all" or one of `recognized` (case-insensitive).
    ///
    /// A name maps to its 1-based position in `recognized`, so only the months
    /// listed there can be selected.
    pub fn parse(input: &str, recognized: &[String]) -> Result<Self> {
        let input = input.trim().to_lowercase();
        if input == ALL {
            return Ok(MonthFilter::All);
        }

        recognized
            .iter()
            .position(|name| name.to_lowercase() == input)
            .map(|idx| MonthFilter::Month(idx as u32 + 1))
            .ok_or(Error::InvalidFilter {
                kind: "month",
                value: input,
            })
    }

    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(m) => match month_name(*m) {
                Some(name) => f.write_str(name),
                None => write!(f, "month {m}"),
            },
        }
    }
}

/// Keeps every trip, or only those started on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayFilter {
    All,
    Day(Weekday),
}

impl DayFilter {
    /// Parses "all" or a full weekday name, case-insensitive.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().to_lowercase();
        if input == ALL {
            return Ok(DayFilter::All);
        }

        weekdays()
            .find(|day| weekday_name(*day).to_lowercase() == input)
            .map(DayFilter::Day)
            .ok_or(Error::InvalidFilter {
                kind: "day",
                value: input,
            })
    }

    pub fn matches(&self, weekday: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == weekday,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str(ALL),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// Monday through Sunday.
pub fn weekdays() -> impl Iterator<Item = Weekday> {
    std::iter::successors(Some(Weekday::Mon), |d| match d {
        Weekday::Sun => None,
        d => Some(d.succ()),
    })
}

/// English name of a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Title-cased name of `month` as listed in `recognized`, the same list
/// [`MonthFilter::parse`] indexes into. Months past the end of the list fall
/// back to [`month_name`].
pub fn month_label(month: u32, recognized: &[String]) -> String {
    let configured = (month as usize)
        .checked_sub(1)
        .and_then(|idx| recognized.get(idx))
        .map(|name| title_case(name));

    configured
        .or_else(|| month_name(month).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn title_case(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
