use chrono::TimeDelta;
use tracing::warn;

use crate::analyzers::types::DurationReport;
use crate::dataset::{Field, Schema, Trip};

const REQUIRED: [Field; 2] = [Field::StartTime, Field::EndTime];

/// Sum and mean of `end - start`.
///
/// Trips without an end time are skipped. Negative durations are kept as
/// they are and counted in the report.
#[tracing::instrument(name = "trip_duration_stats", skip_all, fields(trips = trips.len()))]
pub fn trip_duration_stats(trips: &[Trip], schema: Schema) -> Option<DurationReport> {
    if !schema.has_all(&REQUIRED) {
        return None;
    }

    let durations: Vec<TimeDelta> = trips.iter().filter_map(Trip::travel_time).collect();
    if durations.is_empty() {
        return None;
    }

    let total = durations
        .iter()
        .fold(TimeDelta::zero(), |acc, d| acc + *d);
    let mean = TimeDelta::milliseconds(total.num_milliseconds() / durations.len() as i64);

    let negative_trips = durations.iter().filter(|d| **d < TimeDelta::zero()).count();
    if negative_trips > 0 {
        warn!(negative_trips, "Trips end before they start");
    }

    Some(DurationReport {
        total,
        mean,
        trips: durations.len(),
        negative_trips,
    })
}
