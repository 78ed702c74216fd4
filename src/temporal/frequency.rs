use std::fmt;

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref FREQUENCY_PATTERN: std::result::Result<Regex, regex::Error> =
        Regex::new(r"^\s*(\d*)\s*([A-Za-z]+)\s*$");
}

/// 頻度文字列を単位コードと倍数に分割する
///
/// `"5D"` becomes `("D", 5)` and `"M"` becomes `("M", 1)`. Only the shape is
/// checked here; whether the unit code means anything is decided by
/// [`FrequencyUnit::from_code`].
pub fn split_time_span(freq: &str) -> Result<(String, i64)> {
    let pattern = FREQUENCY_PATTERN
        .as_ref()
        .map_err(|e| Error::InvalidFrequency(format!("{}: {}", freq, e)))?;
    let caps = pattern
        .captures(freq)
        .ok_or_else(|| Error::InvalidFrequency(freq.to_string()))?;
    let digits = caps.get(1).map_or("", |m| m.as_str());
    let unit = caps.get(2).map_or("", |m| m.as_str());

    let multiple = if digits.is_empty() {
        1
    } else {
        digits
            .parse::<i64>()
            .map_err(|_| Error::InvalidFrequency(freq.to_string()))?
    };
    if multiple == 0 {
        return Err(Error::InvalidFrequency(freq.to_string()));
    }
    Ok((unit.to_string(), multiple))
}

/// 頻度の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    /// D
    Day,
    /// W
    Week,
    /// SM: the 1st and the 15th of each month
    SemiMonthStart,
    /// M
    MonthEnd,
    /// Y
    YearEnd,
    /// YS
    YearStart,
    /// H
    Hour,
    /// T / min
    Minute,
    /// S
    Second,
    /// L / ms
    Millisecond,
    /// U / us
    Microsecond,
    /// N / ns
    Nanosecond,
}

impl FrequencyUnit {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "D" => FrequencyUnit::Day,
            "W" => FrequencyUnit::Week,
            "SM" => FrequencyUnit::SemiMonthStart,
            "M" => FrequencyUnit::MonthEnd,
            "Y" => FrequencyUnit::YearEnd,
            "YS" => FrequencyUnit::YearStart,
            "H" => FrequencyUnit::Hour,
            "T" | "min" => FrequencyUnit::Minute,
            "S" => FrequencyUnit::Second,
            "L" | "ms" => FrequencyUnit::Millisecond,
            "U" | "us" => FrequencyUnit::Microsecond,
            "N" | "ns" => FrequencyUnit::Nanosecond,
            _ => return None,
        })
    }

    pub fn code(&self) -> &'static str {
        match self {
            FrequencyUnit::Day => "D",
            FrequencyUnit::Week => "W",
            FrequencyUnit::SemiMonthStart => "SM",
            FrequencyUnit::MonthEnd => "M",
            FrequencyUnit::YearEnd => "Y",
            FrequencyUnit::YearStart => "YS",
            FrequencyUnit::Hour => "H",
            FrequencyUnit::Minute => "min",
            FrequencyUnit::Second => "S",
            FrequencyUnit::Millisecond => "ms",
            FrequencyUnit::Microsecond => "us",
            FrequencyUnit::Nanosecond => "ns",
        }
    }

    /// Units stepped on the calendar (valid for date-only starts)
    pub fn is_calendar(&self) -> bool {
        matches!(
            self,
            FrequencyUnit::Day
                | FrequencyUnit::Week
                | FrequencyUnit::SemiMonthStart
                | FrequencyUnit::MonthEnd
                | FrequencyUnit::YearEnd
                | FrequencyUnit::YearStart
        )
    }
}

/// 解析済みの頻度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency {
    pub unit: FrequencyUnit,
    pub multiple: i64,
}

impl Frequency {
    /// 文字列から頻度を解析
    pub fn parse(freq: &str) -> Result<Self> {
        let (code, multiple) = split_time_span(freq)?;
        let unit =
            FrequencyUnit::from_code(&code).ok_or_else(|| Error::InvalidFrequency(freq.to_string()))?;
        Ok(Self { unit, multiple })
    }

    /// Step length for units with a fixed duration. Days and weeks are fixed on
    /// the naive time line; month and year based units are not.
    pub fn fixed_duration(&self) -> Option<Duration> {
        let n = self.multiple;
        match self.unit {
            FrequencyUnit::Day => Duration::try_days(n),
            FrequencyUnit::Week => Duration::try_weeks(n),
            FrequencyUnit::Hour => Duration::try_hours(n),
            FrequencyUnit::Minute => Duration::try_minutes(n),
            FrequencyUnit::Second => Duration::try_seconds(n),
            FrequencyUnit::Millisecond => Duration::try_milliseconds(n),
            FrequencyUnit::Microsecond => Some(Duration::microseconds(n)),
            FrequencyUnit::Nanosecond => Some(Duration::nanoseconds(n)),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiple, self.unit.code())
    }
}
