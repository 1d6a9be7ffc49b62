//! Report types produced by the aggregators.

use chrono::TimeDelta;
use serde::{Serialize, Serializer};

use crate::filter::{DayFilter, MonthFilter};

/// A value together with how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Popular<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Popular<U> {
        Popular {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Most frequent travel times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeReport {
    pub month: Popular<String>,
    pub weekday: Popular<String>,
    pub hour: Popular<u32>,
}

/// Most used stations and route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub start_station: Popular<String>,
    pub end_station: Popular<String>,
    pub trip: Popular<String>,
}

/// Total and mean travel time over trips that have an end time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    #[serde(rename = "total_seconds", serialize_with = "as_seconds")]
    pub total: TimeDelta,
    #[serde(rename = "mean_seconds", serialize_with = "as_seconds")]
    pub mean: TimeDelta,
    pub trips: usize,
    /// Trips whose end time precedes their start time.
    pub negative_trips: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearReport {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Popular<i32>,
}

/// Rider demographics. Each part is `None` when its column is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user_types: Option<Vec<Popular<String>>>,
    pub genders: Option<Vec<Popular<String>>>,
    pub birth_years: Option<BirthYearReport>,
}

/// Everything computed for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: String,
    pub month: MonthFilter,
    pub day: DayFilter,
    pub records: usize,
    pub time: Option<TimeReport>,
    pub stations: Option<StationReport>,
    pub durations: Option<DurationReport>,
    pub users: Option<UserReport>,
}

fn as_seconds<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(delta.num_milliseconds() as f64 / 1000.0)
}
