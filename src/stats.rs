use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::CityReport;

/// One flattened CSV row summarising a [`CityReport`].
#[derive(Debug, Default, Serialize)]
pub struct SummaryRow {
    pub timestamp: DateTime<Utc>,
    pub city: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub records: usize,

    // travel times
    pub popular_month: Option<String>,
    pub popular_weekday: Option<String>,
    pub popular_hour: Option<u32>,

    // stations
    pub popular_start_station: Option<String>,
    pub popular_end_station: Option<String>,
    pub popular_trip: Option<String>,

    // durations
    pub total_travel_seconds: Option<i64>,
    pub mean_travel_seconds: Option<i64>,
    pub negative_trips: Option<usize>,

    // riders
    pub top_user_type: Option<String>,
    pub top_gender: Option<String>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub popular_birth_year: Option<i32>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl SummaryRow {
    pub fn from_report(report: &CityReport) -> Self {
        let mut s = SummaryRow {
            timestamp: Utc::now(),
            city: Some(report.city.clone()),
            month: Some(report.month.to_string()),
            day: Some(report.day.to_string()),
            records: report.records,
            ..Default::default()
        };

        if let Some(time) = &report.time {
            s.popular_month = Some(time.month.value.clone());
            s.popular_weekday = Some(time.weekday.value.clone());
            s.popular_hour = Some(time.hour.value);
        }

        if let Some(stations) = &report.stations {
            s.popular_start_station = Some(stations.start_station.value.clone());
            s.popular_end_station = Some(stations.end_station.value.clone());
            s.popular_trip = Some(stations.trip.value.clone());
        }

        if let Some(durations) = &report.durations {
            s.total_travel_seconds = Some(durations.total.num_seconds());
            s.mean_travel_seconds = Some(durations.mean.num_seconds());
            s.negative_trips = Some(durations.negative_trips);
        }

        if let Some(users) = &report.users {
            s.top_user_type = users
                .user_types
                .as_ref()
                .and_then(|counts| counts.first())
                .map(|p| p.value.clone());
            s.top_gender = users
                .genders
                .as_ref()
                .and_then(|counts| counts.first())
                .map(|p| p.value.clone());

            if let Some(years) = &users.birth_years {
                s.earliest_birth_year = Some(years.earliest);
                s.most_recent_birth_year = Some(years.most_recent);
                s.popular_birth_year = Some(years.most_common.value);
            }
        }

        s
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        SummaryRow {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set the selection this row describes
    pub fn with_selection(mut self, city: &str, month: &str, day: &str) -> Self {
        self.city = Some(city.to_string());
        self.month = Some(month.to_string());
        self.day = Some(day.to_string());
        self
    }
}
