use crate::analyzers::types::StationReport;
use crate::analyzers::utility::mode;
use crate::dataset::{Field, Schema, Trip};

const REQUIRED: [Field; 2] = [Field::StartStation, Field::EndStation];

/// Most used start station, end station and "<start> to <end>" route.
#[tracing::instrument(name = "station_stats", skip_all, fields(trips = trips.len()))]
pub fn station_stats(trips: &[Trip], schema: Schema) -> Option<StationReport> {
    if !schema.has_all(&REQUIRED) {
        return None;
    }

    let start_station = mode(trips.iter().filter_map(|t| t.start_station.as_deref()))?;
    let end_station = mode(trips.iter().filter_map(|t| t.end_station.as_deref()))?;
    let trip = mode(trips.iter().filter_map(Trip::route))?;

    Some(StationReport {
        start_station: start_station.map(str::to_string),
        end_station: end_station.map(str::to_string),
        trip,
    })
}
