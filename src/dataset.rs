//! In-memory trip records and the schema describing which columns a city provides.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::{DayFilter, MonthFilter};

/// A column of the trip files, named by its CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "Start Time")]
    StartTime,
    #[serde(rename = "End Time")]
    EndTime,
    #[serde(rename = "Start Station")]
    StartStation,
    #[serde(rename = "End Station")]
    EndStation,
    #[serde(rename = "User Type")]
    UserType,
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Birth Year")]
    BirthYear,
}

impl Field {
    pub const COUNT: usize = 7;

    pub const ALL: [Field; Field::COUNT] = [
        Field::StartTime,
        Field::EndTime,
        Field::StartStation,
        Field::EndStation,
        Field::UserType,
        Field::Gender,
        Field::BirthYear,
    ];

    /// Header name used in the source files.
    pub fn header(self) -> &'static str {
        match self {
            Field::StartTime => "Start Time",
            Field::EndTime => "End Time",
            Field::StartStation => "Start Station",
            Field::EndStation => "End Station",
            Field::UserType => "User Type",
            Field::Gender => "Gender",
            Field::BirthYear => "Birth Year",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Set of columns present in a dataset.
///
/// Fixed when the dataset is loaded; aggregators consult it before touching
/// any optional field and do nothing when their fields are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema(u8);

impl Schema {
    /// Schema with only the mandatory `Start Time` column.
    pub fn required() -> Self {
        Schema(Field::StartTime.bit())
    }

    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        fields
            .into_iter()
            .fold(Schema::required(), |schema, field| schema.with(field))
    }

    pub fn with(self, field: Field) -> Self {
        Schema(self.0 | field.bit())
    }

    pub fn has(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn has_all(self, fields: &[Field]) -> bool {
        fields.iter().all(|f| self.has(*f))
    }

    pub fn has_any(self, fields: &[Field]) -> bool {
        fields.iter().any(|f| self.has(*f))
    }

    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

/// Column presence check used by every aggregator.
pub fn has_field(dataset: &Dataset, field: Field) -> bool {
    dataset.schema().has(field)
}

/// Full English name of a weekday, e.g. "Monday".
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One ride.
///
/// `month` and `weekday` are derived from the start time and only change
/// through [`Trip::set_start_time`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    start_time: NaiveDateTime,
    month: u32,
    weekday: Weekday,
    pub end_time: Option<NaiveDateTime>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl Trip {
    pub fn new(start_time: NaiveDateTime) -> Self {
        Trip {
            start_time,
            month: start_time.month(),
            weekday: start_time.weekday(),
            end_time: None,
            start_station: None,
            end_station: None,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = Some(start.to_string());
        self.end_station = Some(end.to_string());
        self
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: NaiveDateTime) {
        self.start_time = start_time;
        self.month = start_time.month();
        self.weekday = start_time.weekday();
    }

    /// Calendar month of the start time, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Start hour, computed on demand.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// `end - start`, sign preserved. `None` without an end time.
    pub fn travel_time(&self) -> Option<chrono::TimeDelta> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// "<start> to <end>" when both stations are known.
    pub fn route(&self) -> Option<String> {
        match (&self.start_station, &self.end_station) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            _ => None,
        }
    }

    fn matches(&self, month: &MonthFilter, day: &DayFilter) -> bool {
        month.matches(self.month) && day.matches(self.weekday)
    }

    fn clear_absent(&mut self, schema: Schema) {
        if !schema.has(Field::EndTime) {
            self.end_time = None;
        }
        if !schema.has(Field::StartStation) {
            self.start_station = None;
        }
        if !schema.has(Field::EndStation) {
            self.end_station = None;
        }
        if !schema.has(Field::UserType) {
            self.user_type = None;
        }
        if !schema.has(Field::Gender) {
            self.gender = None;
        }
        if !schema.has(Field::BirthYear) {
            self.birth_year = None;
        }
    }
}

/// Ordered trips of one city plus the columns that city provides.
///
/// Order is file order; filtering only ever removes trips.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    trips: Vec<Trip>,
}

impl Dataset {
    /// Builds a dataset, dropping any value whose column is not in `schema`.
    pub fn new(schema: Schema, mut trips: Vec<Trip>) -> Self {
        for trip in &mut trips {
            trip.clear_absent(schema);
        }
        Dataset { schema, trips }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keeps the trips matching both filters, in their original order.
    pub fn filtered(mut self, month: &MonthFilter, day: &DayFilter) -> Self {
        self.trips.retain(|trip| trip.matches(month, day));
        self
    }

    /// Replaces each missing optional value with the next present value of the
    /// same column further down the dataset. Trailing gaps stay missing.
    ///
    /// Returns the number of values filled.
    pub fn backfill(&mut self) -> usize {
        let mut filled = 0;
        let mut end_time = None;
        let mut start_station = None;
        let mut end_station = None;
        let mut user_type = None;
        let mut gender = None;
        let mut birth_year = None;

        for trip in self.trips.iter_mut().rev() {
            filled += fill(&mut trip.end_time, &mut end_time);
            filled += fill(&mut trip.start_station, &mut start_station);
            filled += fill(&mut trip.end_station, &mut end_station);
            filled += fill(&mut trip.user_type, &mut user_type);
            filled += fill(&mut trip.gender, &mut gender);
            filled += fill(&mut trip.birth_year, &mut birth_year);
        }

        filled
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, next: &mut Option<T>) -> usize {
    match slot {
        Some(value) => {
            *next = Some(value.clone());
            0
        }
        None => match next {
            Some(value) => {
                *slot = Some(value.clone());
                1
            }
            None => 0,
        },
    }
}
