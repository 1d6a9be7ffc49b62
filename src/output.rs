//! Output formatting and persistence for analysis reports.
//!
//! Supports console text, pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::TimeDelta;
use std::fmt;
use tracing::{debug, info};

use crate::analyzers::types::{CityReport, Popular};
use crate::dataset::{Trip, weekday_name};
use crate::stats::SummaryRow;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

const RULE: &str = "----------------------------------------";

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &CityReport) {
    debug!("{:#?}", report);
}

/// Renders a report as pretty-printed JSON.
pub fn print_json(report: &CityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Appends a [`SummaryRow`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, row: &SummaryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    info!(path, "Summary row written");
    Ok(())
}

/// `[-]D days HH:MM:SS`, whole seconds.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let secs = delta.num_seconds().unsigned_abs();
    let (days, rest) = (secs / 86_400, secs % 86_400);
    format!(
        "{sign}{days} days {:02}:{:02}:{:02}",
        rest / 3600,
        rest % 3600 / 60,
        rest % 60
    )
}

fn counts_table(f: &mut fmt::Formatter<'_>, title: &str, counts: &[Popular<String>]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    let width = counts.iter().map(|p| p.value.len()).max().unwrap_or(0);
    for p in counts {
        writeln!(f, "  {:<width$}  {}", p.value, p.count)?;
    }
    writeln!(f)
}

impl fmt::Display for CityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} trips for {} (month: {}, day: {})",
            self.records, self.city, self.month, self.day
        )?;
        writeln!(f, "{RULE}")?;

        if let Some(time) = &self.time {
            writeln!(f, "\nThe Most Frequent Times of Travel\n")?;
            writeln!(f, "The most popular month was {}.", time.month.value)?;
            writeln!(f, "The most popular day was {}.", time.weekday.value)?;
            writeln!(f, "The most popular starting hour was {}.", time.hour.value)?;
            writeln!(f, "{RULE}")?;
        }

        if let Some(stations) = &self.stations {
            writeln!(f, "\nThe Most Popular Stations and Trip\n")?;
            writeln!(
                f,
                "The most popular starting station was {}.",
                stations.start_station.value
            )?;
            writeln!(
                f,
                "The most popular ending station was {}.",
                stations.end_station.value
            )?;
            writeln!(f, "The most popular trip was {}.", stations.trip.value)?;
            writeln!(f, "{RULE}")?;
        }

        if let Some(durations) = &self.durations {
            writeln!(f, "\nTrip Duration\n")?;
            writeln!(f, "Total travel time was {}.", format_duration(durations.total))?;
            writeln!(f, "The mean travel time is {}.", format_duration(durations.mean))?;
            writeln!(f, "{RULE}")?;
        }

        if let Some(users) = &self.users {
            writeln!(f, "\nUser Stats\n")?;
            if let Some(user_types) = &users.user_types {
                counts_table(f, "User Types", user_types)?;
            }
            if let Some(genders) = &users.genders {
                counts_table(f, "Gender", genders)?;
            }
            if let Some(years) = &users.birth_years {
                writeln!(f, "The earliest recorded year of birth is {}", years.earliest)?;
                writeln!(f, "The most recent recorded year of birth is {}", years.most_recent)?;
                writeln!(f, "The most popular year of birth is {}", years.most_common.value)?;
            }
            writeln!(f, "{RULE}")?;
        }

        Ok(())
    }
}

/// Renders a report as the console text shown after each selection.
pub fn render_report(report: &CityReport) -> String {
    report.to_string()
}

/// Renders one page of raw records; `offset` is the index of the first one.
pub fn render_chunk(trips: &[Trip], offset: usize) -> String {
    trips
        .iter()
        .enumerate()
        .map(|(i, trip)| {
            let end_time = trip
                .end_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            let birth_year = trip
                .birth_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:>6}  {} ({})  {}  {} -> {}  {}  {}  {}\n",
                offset + i,
                trip.start_time(),
                weekday_name(trip.weekday()),
                end_time,
                trip.start_station.as_deref().unwrap_or("-"),
                trip.end_station.as_deref().unwrap_or("-"),
                trip.user_type.as_deref().unwrap_or("-"),
                trip.gender.as_deref().unwrap_or("-"),
                birth_year,
            )
        })
        .collect()
}
