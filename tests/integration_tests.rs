use bikeshare_stats::Error;
use bikeshare_stats::analyzers::analyzer::analyze;
use bikeshare_stats::dataset::{Dataset, Field, weekday_name};
use bikeshare_stats::filter::{DayFilter, MonthFilter, weekdays};
use bikeshare_stats::loader::{Loader, MissingValues, Selection};
use bikeshare_stats::registry::{CityEntry, CityRegistry, RegistryConfig};
use bikeshare_stats::viewer::RecordPager;
use chrono::{TimeDelta, Weekday};
use std::env;
use std::fs;
use std::path::PathBuf;

fn fixtures() -> CityRegistry {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    CityRegistry::new(RegistryConfig::default().with_data_dir(dir))
}

fn load(registry: &CityRegistry, city: &str, month: &str, day: &str) -> (Selection, Dataset) {
    let selection = Selection::parse(registry, city, month, day).expect("valid selection");
    let dataset = Loader::new(registry)
        .load_selection(&selection)
        .expect("Failed to load fixture");
    (selection, dataset)
}

/// Registry with a single city backed by `file_name` in the temp dir.
fn temp_city(file_name: &str, columns: &[Field]) -> CityRegistry {
    CityRegistry::new(RegistryConfig {
        data_dir: env::temp_dir(),
        months: RegistryConfig::default().months,
        cities: vec![CityEntry {
            id: "testville".to_string(),
            source: file_name.to_string(),
            columns: columns.to_vec(),
        }],
    })
}

#[test]
fn test_full_pipeline() {
    let registry = fixtures();
    let (selection, dataset) = load(&registry, "chicago", "all", "all");
    let report = analyze(&selection, &dataset, registry.months());

    assert_eq!(report.records, 8);

    let time = report.time.unwrap();
    assert_eq!(time.month.value, "January");
    assert_eq!(time.month.count, 3);
    // Friday and Monday both occur twice; Friday comes first in the file
    assert_eq!(time.weekday.value, "Friday");
    assert_eq!(time.hour.value, 14);

    let stations = report.stations.unwrap();
    assert_eq!(stations.start_station.value, "Theater on the Lake");
    assert_eq!(stations.end_station.value, "Sheffield Ave & Waveland Ave");
    assert_eq!(
        stations.trip.value,
        "Theater on the Lake to Sheffield Ave & Waveland Ave"
    );
    assert_eq!(stations.trip.count, 2);

    let durations = report.durations.unwrap();
    assert_eq!(durations.total, TimeDelta::seconds(4821));
    assert_eq!(durations.mean, TimeDelta::milliseconds(602_625));

    let users = report.users.unwrap();
    let user_types = users.user_types.unwrap();
    assert_eq!(user_types[0].value, "Subscriber");
    assert_eq!(user_types[0].count, 7);
    let genders = users.genders.unwrap();
    assert_eq!(genders[0].value, "Male");
    assert_eq!(genders[0].count, 6);
    let years = users.birth_years.unwrap();
    assert_eq!(years.earliest, 1975);
    assert_eq!(years.most_recent, 1992);
    assert_eq!(years.most_common.value, 1992);
}

#[test]
fn test_day_filter_keeps_file_order() {
    let registry = fixtures();
    let (_, dataset) = load(&registry, "chicago", "all", "Monday");

    let starts: Vec<String> = dataset
        .trips()
        .iter()
        .map(|t| t.start_time().to_string())
        .collect();
    assert_eq!(starts, vec!["2017-03-06 13:49:38", "2017-06-26 09:01:20"]);
}

#[test]
fn test_month_and_day_filters_combine() {
    let registry = fixtures();
    let (_, dataset) = load(&registry, "chicago", "june", "monday");

    assert_eq!(dataset.len(), 1);
    assert_eq!(
        dataset.trips()[0].start_station.as_deref(),
        Some("Clinton St & Washington Blvd")
    );
}

#[test]
fn test_every_selection_respects_filters_and_order() {
    let registry = fixtures();
    let (_, everything) = load(&registry, "chicago", "all", "all");

    let mut months = vec!["all".to_string()];
    months.extend(registry.months().iter().cloned());
    let mut days = vec!["all".to_string()];
    days.extend(weekdays().map(|d| weekday_name(d).to_lowercase()));

    for month in &months {
        for day in &days {
            let (selection, dataset) = load(&registry, "chicago", month, day);

            for trip in dataset.trips() {
                assert!(selection.month.matches(trip.month()), "{month}/{day}");
                assert!(selection.day.matches(trip.weekday()), "{month}/{day}");
            }

            // sub-sequence of the unfiltered dataset
            let mut rest = everything.trips().iter();
            for trip in dataset.trips() {
                assert!(rest.any(|t| t == trip), "{month}/{day} reordered");
            }

            let again = dataset.clone().filtered(&selection.month, &selection.day);
            assert_eq!(again, dataset);
        }
    }
}

#[test]
fn test_washington_has_no_demographics() {
    let registry = fixtures();
    let (selection, dataset) = load(&registry, "Washington", "all", "all");
    let report = analyze(&selection, &dataset, registry.months());

    assert!(!dataset.schema().has(Field::Gender));
    let users = report.users.unwrap();
    assert!(users.genders.is_none());
    assert!(users.birth_years.is_none());
    let user_types = users.user_types.unwrap();
    assert_eq!(user_types[0].value, "Subscriber");
    assert_eq!(user_types[0].count, 4);
    assert_eq!(user_types[1].count, 2);

    let durations = report.durations.unwrap();
    assert_eq!(durations.total, TimeDelta::seconds(5262));
    assert_eq!(durations.mean, TimeDelta::seconds(877));
}

#[test]
fn test_empty_selection() {
    let registry = fixtures();
    // no Tuesday trips in the fixture for April
    let (selection, dataset) = load(&registry, "washington", "april", "tuesday");
    let report = analyze(&selection, &dataset, registry.months());

    assert!(dataset.is_empty());
    assert!(report.time.is_none());
    assert!(report.stations.is_none());
    assert!(report.durations.is_none());
}

#[test]
fn test_backfill_changes_dataset() {
    let registry = fixtures();
    let selection = Selection::parse(&registry, "new york city", "all", "all").unwrap();

    let kept = Loader::new(&registry).load_selection(&selection).unwrap();
    let filled = Loader::new(&registry)
        .with_missing_values(MissingValues::Backfill)
        .load_selection(&selection)
        .unwrap();

    assert_eq!(kept.trips()[1].gender, None);
    assert_eq!(filled.trips()[1].gender.as_deref(), Some("Female"));
    assert_eq!(filled.trips()[1].birth_year, Some(1969));
    assert_eq!(filled.trips()[2].user_type.as_deref(), Some("Subscriber"));
    // nothing below the last record to fill from
    assert_eq!(filled.trips()[5].gender, None);

    let kept_users = analyze(&selection, &kept, registry.months()).users.unwrap();
    let filled_users = analyze(&selection, &filled, registry.months()).users.unwrap();

    let genders = kept_users.genders.unwrap();
    assert_eq!((genders[0].value.as_str(), genders[0].count), ("Male", 2));
    let genders = filled_users.genders.unwrap();
    assert_eq!((genders[0].value.as_str(), genders[0].count), ("Female", 3));
    assert_eq!(kept_users.birth_years.unwrap().most_common.value, 1998);
    assert_eq!(filled_users.birth_years.unwrap().most_common.value, 1969);
}

#[test]
fn test_pager_over_loaded_dataset() {
    let registry = fixtures();
    let (_, dataset) = load(&registry, "chicago", "all", "all");

    let chunks: Vec<_> = RecordPager::new(&dataset).collect();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].len(), 5);
    assert_eq!(chunks[1].len(), 3);
    assert_eq!(chunks[1][2].user_type.as_deref(), Some("Customer"));
}

#[test]
fn test_unknown_city() {
    let registry = fixtures();
    let err = Loader::new(&registry)
        .load("boston", &MonthFilter::All, &DayFilter::All)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownCity(_)));
}

#[test]
fn test_missing_source() {
    let registry = temp_city("bikeshare_stats_it_does_not_exist.csv", &[]);
    let err = Loader::new(&registry)
        .load("testville", &MonthFilter::All, &DayFilter::All)
        .unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[test]
fn test_malformed_start_time() {
    let name = "bikeshare_stats_it_malformed.csv";
    let path = env::temp_dir().join(name);
    fs::write(
        &path,
        "Start Time,End Time\n2017-01-02 08:00:00,2017-01-02 08:05:00\n02/30/2017 25:00,2017-01-02 08:05:00\n",
    )
    .unwrap();

    let registry = temp_city(name, &[Field::EndTime]);
    let err = Loader::new(&registry)
        .load("testville", &MonthFilter::All, &DayFilter::Day(Weekday::Mon))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedRecord { line: 3, field: "Start Time", .. }
    ));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_gzip_source() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let name = "bikeshare_stats_it_trips.csv.gz";
    let path = env::temp_dir().join(name);
    let plain = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/washington.csv");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&fs::read(plain).unwrap()).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let registry = temp_city(name, &[Field::StartStation, Field::EndStation, Field::UserType]);
    let dataset = Loader::new(&registry)
        .load("testville", &MonthFilter::Month(6), &DayFilter::All)
        .unwrap();

    assert_eq!(dataset.len(), 2);
    assert!(!dataset.schema().has(Field::EndTime));

    fs::remove_file(&path).unwrap();
}
