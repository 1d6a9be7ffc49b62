use tracing::debug;

use crate::analyzers::types::TimeReport;
use crate::analyzers::utility::mode;
use crate::dataset::{Field, Schema, Trip, weekday_name};
use crate::filter::month_label;

/// Most frequent month, weekday and start hour.
///
/// The month is named from `months`, the list selections are parsed against.
/// Returns `None` for an empty dataset, where no mode exists.
#[tracing::instrument(name = "time_stats", skip_all, fields(trips = trips.len()))]
pub fn time_stats(trips: &[Trip], schema: Schema, months: &[String]) -> Option<TimeReport> {
    if !schema.has(Field::StartTime) {
        return None;
    }

    let month = mode(trips.iter().map(Trip::month))?;
    let weekday = mode(trips.iter().map(Trip::weekday))?;
    let hour = mode(trips.iter().map(Trip::hour))?;
    debug!(month = month.value, hour = hour.value, "Popular times computed");

    Some(TimeReport {
        month: month.map(|m| month_label(m, months)),
        weekday: weekday.map(|d| weekday_name(d).to_string()),
        hour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(month: u32, day: u32, hour: u32) -> Trip {
        Trip::new(
            NaiveDate::from_ymd_opt(2017, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_popular_times() {
        // 2017-03-06 Monday, 2017-03-07 Tuesday, 2017-05-01 Monday
        let trips = vec![trip(3, 6, 8), trip(3, 7, 17), trip(5, 1, 17), trip(3, 6, 9)];
        let report = time_stats(&trips, Schema::required(), &[]).unwrap();

        assert_eq!(report.month.value, "March");
        assert_eq!(report.month.count, 3);
        assert_eq!(report.weekday.value, "Monday");
        assert_eq!(report.hour.value, 17);
        assert_eq!(report.hour.count, 2);
    }

    #[test]
    fn test_hour_tie_uses_first_occurrence() {
        let trips = vec![trip(1, 2, 23), trip(1, 2, 7), trip(1, 3, 7), trip(1, 3, 23)];
        let report = time_stats(&trips, Schema::required(), &[]).unwrap();
        assert_eq!(report.hour.value, 23);
    }

    #[test]
    fn test_month_named_from_configured_list() {
        let months: Vec<String> = ["jan", "feb", "mar"].iter().map(|m| m.to_string()).collect();
        let trips = vec![trip(2, 6, 8), trip(2, 7, 9)];
        let report = time_stats(&trips, Schema::required(), &months).unwrap();
        assert_eq!(report.month.value, "Feb");
    }

    #[test]
    fn test_empty_dataset_has_no_report() {
        assert!(time_stats(&[], Schema::required(), &[]).is_none());
    }
}
