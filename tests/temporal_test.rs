use chrono::{NaiveDate, NaiveDateTime};
use framekit::temporal::{bin_counts, generate_bins, split_time_span, FrequencyUnit};
use framekit::{date_range, datetime_range, Error, Frequency, RangeBound, TimestampColumn};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn dates(col: &TimestampColumn) -> Vec<NaiveDate> {
    (0..col.len())
        .map(|i| col.datetime(i).unwrap().unwrap().date())
        .collect()
}

#[test]
fn test_frequency_parsing() {
    assert_eq!(split_time_span("5D").unwrap(), ("D".to_string(), 5));
    assert_eq!(split_time_span("M").unwrap(), ("M".to_string(), 1));

    let freq = Frequency::parse("15min").unwrap();
    assert_eq!(freq.unit, FrequencyUnit::Minute);
    assert_eq!(freq.multiple, 15);

    assert!(matches!(Frequency::parse("3Q"), Err(Error::InvalidFrequency(_))));
    assert!(matches!(Frequency::parse("D5"), Err(Error::InvalidFrequency(_))));
    assert!(matches!(Frequency::parse("0D"), Err(Error::InvalidFrequency(_))));
}

#[test]
fn test_two_day_range() {
    let range = date_range(date(2023, 1, 1), RangeBound::End(date(2023, 1, 10)), "2D", "").unwrap();
    assert_eq!(
        dates(&range),
        vec![
            date(2023, 1, 1),
            date(2023, 1, 3),
            date(2023, 1, 5),
            date(2023, 1, 7),
            date(2023, 1, 9),
        ]
    );
}

#[test]
fn test_month_end_periods() {
    let range = date_range(date(2023, 1, 15), RangeBound::Periods(3), "M", "UTC").unwrap();
    assert_eq!(
        dates(&range),
        vec![date(2023, 1, 31), date(2023, 2, 28), date(2023, 3, 31)]
    );
    assert_eq!(range.timezone(), Some("UTC"));
}

#[test]
fn test_year_start_and_weekly() {
    let years = date_range(date(2021, 6, 1), RangeBound::End(date(2024, 1, 1)), "YS", "").unwrap();
    assert_eq!(
        dates(&years),
        vec![date(2021, 1, 1), date(2022, 1, 1), date(2023, 1, 1), date(2024, 1, 1)]
    );

    let weeks = date_range(date(2023, 1, 2), RangeBound::Periods(3), "W", "").unwrap();
    assert_eq!(
        dates(&weeks),
        vec![date(2023, 1, 2), date(2023, 1, 9), date(2023, 1, 16)]
    );
}

#[test]
fn test_hourly_datetime_range() {
    let range = datetime_range(
        datetime(2023, 1, 1, 22, 0),
        RangeBound::End(datetime(2023, 1, 2, 1, 0)),
        "H",
        "",
    )
    .unwrap();
    assert_eq!(range.len(), 4);
    assert_eq!(range.datetime(3).unwrap(), Some(datetime(2023, 1, 2, 1, 0)));
}

#[test]
fn test_unit_tables_are_separate() {
    assert!(matches!(
        datetime_range(datetime(2023, 1, 1, 0, 0), RangeBound::Periods(2), "M", ""),
        Err(Error::UnsupportedFrequencyUnit { .. })
    ));
    assert!(matches!(
        date_range(date(2023, 1, 1), RangeBound::Periods(2), "5min", ""),
        Err(Error::UnsupportedFrequencyUnit { .. })
    ));
}

#[test]
fn test_invalid_timezone() {
    assert!(date_range(date(2023, 1, 1), RangeBound::Periods(2), "D", "Mars/Olympus").is_err());
}

#[test]
fn test_bins_scenario() {
    let values = framekit::column::Int64Column::new(vec![0, 5, 10, 15, 20, 25, 30]);
    let edges = framekit::column::Int64Column::new(vec![0, 10, 20, 30]);
    let bins = generate_bins(&values, &edges, true).unwrap();
    assert_eq!(bins, vec![3, 5, 7]);
    assert_eq!(bin_counts(&bins).unwrap(), vec![3, 2, 2]);
}
