//! CSV loader for bike-share trip files.
//!
//! Reads every record of a city's file, derives the calendar fields from the
//! start time, then applies the month and day filters.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, Field, Schema, Trip};
use crate::error::{Error, Result};
use crate::filter::{DayFilter, MonthFilter};
use crate::registry::CityRegistry;

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// What to do with empty cells in optional columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValues {
    /// Leave them missing; aggregators skip them.
    #[default]
    Keep,
    /// Fill each gap with the next value below it in the filtered dataset.
    Backfill,
}

/// A validated city/month/day choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub city: String,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Selection {
    /// Validates raw choices against the registry.
    pub fn parse(registry: &CityRegistry, city: &str, month: &str, day: &str) -> Result<Self> {
        registry.resolve(city)?;
        Ok(Selection {
            city: city.trim().to_lowercase(),
            month: MonthFilter::parse(month, registry.months())?,
            day: DayFilter::parse(day)?,
        })
    }
}

pub struct Loader<'a> {
    registry: &'a CityRegistry,
    missing: MissingValues,
}

impl<'a> Loader<'a> {
    pub fn new(registry: &'a CityRegistry) -> Self {
        Self {
            registry,
            missing: MissingValues::Keep,
        }
    }

    pub fn with_missing_values(mut self, missing: MissingValues) -> Self {
        self.missing = missing;
        self
    }

    pub fn load_selection(&self, selection: &Selection) -> Result<Dataset> {
        self.load(&selection.city, &selection.month, &selection.day)
    }

    /// Loads a city's trips and keeps those matching both filters, in file order.
    #[tracing::instrument(skip_all, fields(city = %city_id, month = %month, day = %day))]
    pub fn load(&self, city_id: &str, month: &MonthFilter, day: &DayFilter) -> Result<Dataset> {
        let source = self.registry.resolve(city_id)?;
        let reader = source.location.open()?;
        let dataset = read_trips(reader, source.expected, &source.location.to_string())?;
        let total = dataset.len();

        let mut dataset = dataset.filtered(month, day);

        if self.missing == MissingValues::Backfill {
            let filled = dataset.backfill();
            debug!(filled, "Backfilled missing values");
        }

        info!(total, kept = dataset.len(), "Trip data loaded");
        Ok(dataset)
    }
}

/// Column positions of the fields present in a header.
struct ColumnMap {
    positions: [Option<usize>; Field::COUNT],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, expected: Schema) -> Result<Self> {
        let mut positions = [None; Field::COUNT];

        for field in expected.fields() {
            let position = headers.iter().position(|h| h.trim() == field.header());
            if position.is_none() {
                if field == Field::StartTime {
                    return Err(Error::MissingColumn(field.header()));
                }
                warn!(column = field.header(), "Expected column missing from header");
            }
            positions[field as usize] = position;
        }

        Ok(Self { positions })
    }

    fn schema(&self) -> Schema {
        let present = Field::ALL
            .into_iter()
            .filter(|f| self.positions[*f as usize].is_some());
        Schema::from_fields(present)
    }

    /// Non-empty, trimmed cell of `field`.
    fn cell<'r>(&self, record: &'r StringRecord, field: Field) -> Option<&'r str> {
        self.positions[field as usize]
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Parses a whole CSV trip file into an unfiltered dataset.
///
/// The schema is `expected` narrowed to the columns the header actually has.
/// `origin` names the source in error messages.
pub fn read_trips<R: Read>(reader: R, expected: Schema, origin: &str) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(origin, e))?.clone();
    let columns = ColumnMap::from_headers(&headers, expected)?;
    let schema = columns.schema();
    debug!(?schema, "Columns resolved");

    let mut trips = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(origin, e))?;
        trips.push(parse_trip(&record, &columns)?);
    }

    Ok(Dataset::new(schema, trips))
}

fn parse_trip(record: &StringRecord, columns: &ColumnMap) -> Result<Trip> {
    let line = record.position().map_or(0, |p| p.line());
    let malformed = |field: Field, value: &str| Error::MalformedRecord {
        line,
        field: field.header(),
        value: value.to_string(),
    };

    let raw_start = columns.cell(record, Field::StartTime).unwrap_or_default();
    let start_time =
        parse_timestamp(raw_start).ok_or_else(|| malformed(Field::StartTime, raw_start))?;

    let mut trip = Trip::new(start_time);

    trip.end_time = columns
        .cell(record, Field::EndTime)
        .map(|raw| parse_timestamp(raw).ok_or_else(|| malformed(Field::EndTime, raw)))
        .transpose()?;
    trip.birth_year = columns
        .cell(record, Field::BirthYear)
        .map(|raw| parse_year(raw).ok_or_else(|| malformed(Field::BirthYear, raw)))
        .transpose()?;

    let text = |field| columns.cell(record, field).map(str::to_string);
    trip.start_station = text(Field::StartStation);
    trip.end_station = text(Field::EndStation);
    trip.user_type = text(Field::UserType);
    trip.gender = text(Field::Gender);

    Ok(trip)
}

/// Parses the timestamp layouts found in the published trip files.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Birth years are stored as `1989` or `1989.0`; anything fractional is rejected.
fn parse_year(raw: &str) -> Option<i32> {
    let value: f64 = raw.parse().ok()?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

fn csv_error(origin: &str, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line());
    match err.kind() {
        csv::ErrorKind::Io(_) => Error::SourceUnavailable {
            location: origin.to_string(),
            reason: err.to_string(),
        },
        _ => Error::MalformedRecord {
            line,
            field: "record",
            value: err.to_string(),
        },
    }
}
