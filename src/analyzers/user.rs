use crate::analyzers::types::{BirthYearReport, Popular, UserReport};
use crate::analyzers::utility::{mode, value_counts};
use crate::dataset::{Field, Schema, Trip};

const USER_FIELDS: [Field; 3] = [Field::UserType, Field::Gender, Field::BirthYear];

/// User type and gender breakdowns plus birth-year extremes.
///
/// Returns `None` only when none of the three columns exist; otherwise each
/// part is computed independently.
#[tracing::instrument(name = "user_stats", skip_all, fields(trips = trips.len()))]
pub fn user_stats(trips: &[Trip], schema: Schema) -> Option<UserReport> {
    if !schema.has_any(&USER_FIELDS) {
        return None;
    }

    let user_types = schema
        .has(Field::UserType)
        .then(|| counts(trips.iter().filter_map(|t| t.user_type.as_deref())));
    let genders = schema
        .has(Field::Gender)
        .then(|| counts(trips.iter().filter_map(|t| t.gender.as_deref())));
    let birth_years = if schema.has(Field::BirthYear) {
        birth_year_stats(trips)
    } else {
        None
    };

    Some(UserReport {
        user_types,
        genders,
        birth_years,
    })
}

fn counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Popular<String>> {
    value_counts(values)
        .into_iter()
        .map(|p| p.map(str::to_string))
        .collect()
}

fn birth_year_stats(trips: &[Trip]) -> Option<BirthYearReport> {
    let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();

    Some(BirthYearReport {
        earliest: *years.iter().min()?,
        most_recent: *years.iter().max()?,
        most_common: mode(years.iter().copied())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rider() -> Trip {
        Trip::new(
            NaiveDate::from_ymd_opt(2017, 2, 14)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_counts_ordered_by_frequency() {
        let trips = vec![
            rider().with_user_type("Customer").with_gender("Female"),
            rider().with_user_type("Subscriber").with_gender("Male"),
            rider().with_user_type("Subscriber"),
        ];
        let schema = Schema::from_fields([Field::UserType, Field::Gender]);
        let report = user_stats(&trips, schema).unwrap();

        let user_types = report.user_types.unwrap();
        assert_eq!(user_types[0].value, "Subscriber");
        assert_eq!(user_types[0].count, 2);
        assert_eq!(user_types[1].value, "Customer");

        let genders = report.genders.unwrap();
        assert_eq!(genders.len(), 2);
        assert_eq!(genders[0].value, "Female");
        assert!(report.birth_years.is_none());
    }

    #[test]
    fn test_no_gender_column_still_reports_user_types() {
        let trips = vec![rider().with_user_type("Subscriber")];
        let report = user_stats(&trips, Schema::from_fields([Field::UserType])).unwrap();

        assert!(report.genders.is_none());
        assert_eq!(report.user_types.unwrap().len(), 1);
    }

    #[test]
    fn test_birth_years() {
        let trips = vec![
            rider().with_birth_year(1985),
            rider().with_birth_year(1992),
            rider(),
            rider().with_birth_year(1949),
            rider().with_birth_year(1992),
        ];
        let report = user_stats(&trips, Schema::from_fields([Field::BirthYear])).unwrap();
        let years = report.birth_years.unwrap();

        assert_eq!(years.earliest, 1949);
        assert_eq!(years.most_recent, 1992);
        assert_eq!(years.most_common, Popular { value: 1992, count: 2 });
    }

    #[test]
    fn test_no_user_columns() {
        let trips = vec![rider().with_user_type("Subscriber")];
        assert!(user_stats(&trips, Schema::required()).is_none());
    }
}
