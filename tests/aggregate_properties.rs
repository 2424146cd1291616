use chrono::NaiveDate;
use fatality_trends::aggregate::aggregate;
use fatality_trends::domain::{IncidentRecord, SeriesFilter, TrendBounds};
use fatality_trends::trend::estimate_trend;
use proptest::prelude::*;

const MAKES: [&str; 4] = ["Boeing", "Cessna", "", "Piper"];

/// `(year, make index, fatalities, malformed kind)`; kind 0 is a clean record.
fn raw_records() -> impl Strategy<Value = Vec<(i32, usize, u32, u8)>> {
    prop::collection::vec((1990i32..2020, 0usize..MAKES.len(), 0u32..60, 0u8..6), 0..80)
}

fn build(raw: &[(i32, usize, u32, u8)]) -> Vec<IncidentRecord> {
    raw.iter()
        .map(|&(year, make, fatal, kind)| {
            let date = NaiveDate::from_ymd_opt(year, 3, 15).expect("valid date");
            let mut record = IncidentRecord::new(date, MAKES[make], f64::from(fatal));
            match kind {
                1 => record.event_date = None,
                2 => record.fatalities = None,
                _ => {}
            }
            record
        })
        .collect()
}

proptest! {
    #[test]
    fn totals_match_clean_input(raw in raw_records()) {
        let records = build(&raw);
        let collection = aggregate(&records);

        let expected: f64 = raw
            .iter()
            .filter(|r| r.3 != 1 && r.3 != 2)
            .map(|r| f64::from(r.2))
            .sum();
        let overall: f64 = collection.overall.iter().map(|p| p.total_fatalities).sum();
        let by_make: f64 = collection
            .by_manufacturer
            .values()
            .flat_map(|s| s.iter().map(|p| p.total_fatalities))
            .sum();

        prop_assert_eq!(overall, expected);
        prop_assert_eq!(by_make, expected);
        prop_assert_eq!(
            collection.excluded.total(),
            raw.iter().filter(|r| r.3 == 1 || r.3 == 2).count()
        );
        prop_assert_eq!(collection.records_used + collection.excluded.total(), raw.len());
    }

    #[test]
    fn every_series_has_strictly_increasing_years(raw in raw_records()) {
        let collection = aggregate(&build(&raw));

        for series in std::iter::once(&collection.overall).chain(collection.by_manufacturer.values()) {
            prop_assert!(series.windows(2).all(|w| w[0].year < w[1].year));
        }
        prop_assert_eq!(collection.overall.is_empty(), collection.records_used == 0);
    }

    #[test]
    fn each_year_equals_sum_over_manufacturers(raw in raw_records()) {
        let collection = aggregate(&build(&raw));

        for point in &collection.overall {
            let across_makes: f64 = collection
                .by_manufacturer
                .values()
                .flat_map(|s| s.iter().filter(|p| p.year == point.year))
                .map(|p| p.total_fatalities)
                .sum();
            prop_assert_eq!(point.total_fatalities, across_makes);
        }
        for series in collection.by_manufacturer.values() {
            for p in series {
                prop_assert!(collection.overall.iter().any(|o| o.year == p.year));
            }
        }
    }

    #[test]
    fn every_input_manufacturer_is_selectable(raw in raw_records()) {
        let collection = aggregate(&build(&raw));

        let mut expected: Vec<&str> = raw.iter().map(|r| MAKES[r.1]).collect();
        expected.sort_unstable();
        expected.dedup();
        let keys: Vec<&str> = collection.by_manufacturer.keys().map(String::as_str).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn aggregation_ignores_input_order(raw in raw_records()) {
        let records = build(&raw);
        let mut reversed = records.clone();
        reversed.reverse();

        let first = aggregate(&records);
        prop_assert_eq!(&first, &aggregate(&records));
        prop_assert_eq!(&first, &aggregate(&reversed));
    }

    #[test]
    fn every_label_resolves_to_its_series(raw in raw_records()) {
        let collection = aggregate(&build(&raw));
        let labels = collection.available_labels();

        prop_assert_eq!(labels.first(), Some(&SeriesFilter::All));
        prop_assert_eq!(labels.len(), collection.by_manufacturer.len() + 1);
        for label in &labels[1..] {
            let SeriesFilter::Manufacturer(name) = label else {
                return Err(TestCaseError::fail("only the first label is All"));
            };
            prop_assert_eq!(collection.series(label), collection.by_manufacturer[name].as_slice());
        }
    }

    #[test]
    fn trend_is_defined_once_two_years_exist(raw in raw_records()) {
        let collection = aggregate(&build(&raw));
        let bounds = TrendBounds::default();

        match estimate_trend(&collection.overall, bounds) {
            Ok(line) => {
                prop_assert!(collection.overall.len() >= 2);
                prop_assert_eq!(line.start().year, bounds.from_year);
                prop_assert_eq!(line.end().year, bounds.to_year);
                prop_assert!(line.slope.is_finite() && line.intercept.is_finite());
            }
            Err(_) => prop_assert!(collection.overall.len() < 2),
        }
    }
}
