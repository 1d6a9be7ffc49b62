use tracing::info;

use crate::analyzers::duration::trip_duration_stats;
use crate::analyzers::station::station_stats;
use crate::analyzers::time::time_stats;
use crate::analyzers::types::CityReport;
use crate::analyzers::user::user_stats;
use crate::dataset::Dataset;
use crate::loader::Selection;

/// Runs every aggregator over a loaded dataset.
///
/// Each aggregator checks the dataset's schema itself, so a report section is
/// simply `None` when its columns are missing. `months` is the registry's
/// month list, used to name the popular month.
pub fn analyze(selection: &Selection, dataset: &Dataset, months: &[String]) -> CityReport {
    let trips = dataset.trips();
    let schema = dataset.schema();

    let report = CityReport {
        city: selection.city.clone(),
        month: selection.month,
        day: selection.day,
        records: dataset.len(),
        time: time_stats(trips, schema, months),
        stations: station_stats(trips, schema),
        durations: trip_duration_stats(trips, schema),
        users: user_stats(trips, schema),
    };

    info!(
        city = %report.city,
        records = report.records,
        time = report.time.is_some(),
        stations = report.stations.is_some(),
        durations = report.durations.is_some(),
        users = report.users.is_some(),
        "Analysis complete"
    );

    report
}
