use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::column::{ColumnBuilder, ColumnType, Scalar, TimestampColumn};
use crate::error::{Error, Result};
use crate::temporal::calendar::{self, CalendarCursor};
use crate::temporal::frequency::Frequency;

/// 範囲の終わりの指定方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound<T> {
    /// Inclusive upper bound
    End(T),
    /// Number of points to emit
    Periods(usize),
}

/// 日付から始まる等間隔の時刻列を生成する
///
/// Calendar units (`D`, `W`, `SM`, `M`, `Y`, `YS`) only. Month and year units
/// first move the start to the alignment point of the unit within the start's
/// own month or year (`SM` and `YS` snap back to the 1st, `M` and `Y` forward to
/// the last day), so the first point need not equal `start`.
pub fn date_range(
    start: NaiveDate,
    bound: RangeBound<NaiveDate>,
    freq: &str,
    tz: &str,
) -> Result<TimestampColumn> {
    let freq = Frequency::parse(freq)?;
    let cursor = calendar::date_cursor(start, &freq)?;
    let bound = match bound {
        RangeBound::End(end) => RangeBound::End(end.and_time(chrono::NaiveTime::MIN)),
        RangeBound::Periods(n) => RangeBound::Periods(n),
    };
    collect(cursor, bound, tz)
}

/// 日時から始まる等間隔の時刻列を生成する
///
/// Fixed-duration units (`D`, `W`, `H`, `T`/`min`, `S`, `L`/`ms`, `U`/`us`,
/// `N`/`ns`) only.
pub fn datetime_range(
    start: NaiveDateTime,
    bound: RangeBound<NaiveDateTime>,
    freq: &str,
    tz: &str,
) -> Result<TimestampColumn> {
    let freq = Frequency::parse(freq)?;
    let cursor = calendar::datetime_cursor(start, &freq)?;
    collect(cursor, bound, tz)
}

fn collect(
    mut cursor: Box<dyn CalendarCursor>,
    bound: RangeBound<NaiveDateTime>,
    tz: &str,
) -> Result<TimestampColumn> {
    let data_type = ColumnType::timestamp(tz);
    let mut builder = ColumnBuilder::new(data_type)?;
    if let RangeBound::Periods(n) = bound {
        builder.reserve(n);
    }

    loop {
        let done = match bound {
            RangeBound::End(end) => cursor.current() > end,
            RangeBound::Periods(n) => builder.len() >= n,
        };
        if done {
            break;
        }
        let point = cursor.current();
        let nanos = point.and_utc().timestamp_nanos_opt().ok_or_else(|| {
            Error::BuildError(format!("{} is outside the nanosecond timestamp range", point))
        })?;
        builder
            .append_value(&Scalar::timestamp(nanos, tz))
            .map_err(|e| Error::BuildError(e.to_string()))?;
        cursor.advance()?;
    }

    debug!("date_range produced {} points", builder.len());
    match builder.finish() {
        crate::column::Column::Timestamp(col) => Ok(col),
        other => Err(Error::BuildError(format!(
            "expected a timestamp column, built {}",
            other.column_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(col: &TimestampColumn) -> Vec<NaiveDate> {
        (0..col.len())
            .map(|i| col.datetime(i).unwrap().unwrap().date())
            .collect()
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
                date(2023, 1, 9)
            ]
        );
    }

    #[test]
    fn test_periods_and_timezone_tag() {
        let range = date_range(date(2023, 1, 1), RangeBound::Periods(3), "W", "Asia/Tokyo").unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range.timezone(), Some("Asia/Tokyo"));
        assert_eq!(dates(&range)[2], date(2023, 1, 15));
    }

    #[test]
    fn test_end_before_start_is_empty() {
        let range = date_range(date(2023, 2, 1), RangeBound::End(date(2023, 1, 1)), "D", "").unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_fixed_duration_range() {
        let start = date(2023, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let end = date(2023, 1, 1).and_hms_opt(1, 0, 0).unwrap();
        let range = datetime_range(start, RangeBound::End(end), "15min", "").unwrap();
        assert_eq!(range.len(), 5);
        let step = range.nanos().values()[1] - range.nanos().values()[0];
        assert_eq!(step, 15 * 60 * 1_000_000_000);
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(matches!(
            date_range(date(2023, 1, 1), RangeBound::Periods(1), "D", "Mars/Olympus"),
            Err(Error::InvalidTimezone(_))
        ));
    }
}
