//! Steppable cursors over calendar dates and fixed durations
//!
//! Every cursor exposes the current point and an `advance` that moves it one
//! step forward. Steps never overflow silently: leaving the representable date
//! range is reported as [`Error::BuildError`].

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::temporal::frequency::{Frequency, FrequencyUnit};

/// 暦の上を一歩ずつ進むカーソル
pub trait CalendarCursor {
    fn current(&self) -> NaiveDateTime;
    fn advance(&mut self) -> Result<()>;
}

fn out_of_range(what: impl std::fmt::Display) -> Error {
    Error::BuildError(format!("{} is outside the supported calendar range", what))
}

fn month_end(date: NaiveDate) -> Result<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(|| out_of_range(date))?;
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Day or week steps
#[derive(Debug, Clone)]
pub struct DayCursor {
    current: NaiveDate,
    step_days: i64,
}

impl DayCursor {
    pub fn new(start: NaiveDate, step_days: i64) -> Self {
        Self {
            current: start,
            step_days,
        }
    }
}

impl CalendarCursor for DayCursor {
    fn current(&self) -> NaiveDateTime {
        self.current.and_time(chrono::NaiveTime::MIN)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = Duration::try_days(self.step_days)
            .and_then(|step| self.current.checked_add_signed(step))
            .ok_or_else(|| out_of_range(self.current))?;
        Ok(())
    }
}

/// Month steps that stay on the last day of the month
#[derive(Debug, Clone)]
pub struct MonthEndCursor {
    current: NaiveDate,
    months: u32,
}

impl MonthEndCursor {
    pub fn new(start: NaiveDate, months: u32) -> Result<Self> {
        Ok(Self {
            current: month_end(start)?,
            months,
        })
    }
}

impl CalendarCursor for MonthEndCursor {
    fn current(&self) -> NaiveDateTime {
        self.current.and_time(chrono::NaiveTime::MIN)
    }

    fn advance(&mut self) -> Result<()> {
        let first = self.current.with_day(1).ok_or_else(|| out_of_range(self.current))?;
        let next = first
            .checked_add_months(Months::new(self.months))
            .ok_or_else(|| out_of_range(self.current))?;
        self.current = month_end(next)?;
        Ok(())
    }
}

/// Half-month steps over the 1st and the 15th, starting at the 1st of the start month
#[derive(Debug, Clone)]
pub struct SemiMonthCursor {
    current: NaiveDate,
    halves: u32,
}

impl SemiMonthCursor {
    pub fn new(start: NaiveDate, halves: u32) -> Result<Self> {
        Ok(Self {
            current: start.with_day(1).ok_or_else(|| out_of_range(start))?,
            halves,
        })
    }
}

impl CalendarCursor for SemiMonthCursor {
    fn current(&self) -> NaiveDateTime {
        self.current.and_time(chrono::NaiveTime::MIN)
    }

    fn advance(&mut self) -> Result<()> {
        let half = u32::from(self.current.day() >= 15);
        let target = half + self.halves;
        let first = self.current.with_day(1).ok_or_else(|| out_of_range(self.current))?;
        let month = first
            .checked_add_months(Months::new(target / 2))
            .ok_or_else(|| out_of_range(self.current))?;
        self.current = if target % 2 == 0 {
            month
        } else {
            month.with_day(15).ok_or_else(|| out_of_range(month))?
        };
        Ok(())
    }
}

/// Year steps aligned to January 1st or December 31st
#[derive(Debug, Clone)]
pub struct YearCursor {
    current: NaiveDate,
    years: u32,
}

impl YearCursor {
    pub fn year_start(start: NaiveDate, years: u32) -> Result<Self> {
        Ok(Self {
            current: NaiveDate::from_ymd_opt(start.year(), 1, 1).ok_or_else(|| out_of_range(start))?,
            years,
        })
    }

    pub fn year_end(start: NaiveDate, years: u32) -> Result<Self> {
        Ok(Self {
            current: NaiveDate::from_ymd_opt(start.year(), 12, 31).ok_or_else(|| out_of_range(start))?,
            years,
        })
    }
}

impl CalendarCursor for YearCursor {
    fn current(&self) -> NaiveDateTime {
        self.current.and_time(chrono::NaiveTime::MIN)
    }

    fn advance(&mut self) -> Result<()> {
        // January 1st and December 31st exist in every year, so month arithmetic never clamps here
        self.current = self
            .years
            .checked_mul(12)
            .and_then(|months| self.current.checked_add_months(Months::new(months)))
            .ok_or_else(|| out_of_range(self.current))?;
        Ok(())
    }
}

/// Fixed-duration steps on the naive time line
#[derive(Debug, Clone)]
pub struct DurationCursor {
    current: NaiveDateTime,
    step: Duration,
}

impl DurationCursor {
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self {
            current: start,
            step,
        }
    }
}

impl CalendarCursor for DurationCursor {
    fn current(&self) -> NaiveDateTime {
        self.current
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self
            .current
            .checked_add_signed(self.step)
            .ok_or_else(|| out_of_range(self.current))?;
        Ok(())
    }
}

fn multiple_u32(freq: &Frequency) -> Result<u32> {
    u32::try_from(freq.multiple).map_err(|_| Error::InvalidFrequency(freq.to_string()))
}

/// Cursor for a date-only start; only calendar units are accepted
pub fn date_cursor(start: NaiveDate, freq: &Frequency) -> Result<Box<dyn CalendarCursor>> {
    Ok(match freq.unit {
        FrequencyUnit::Day => Box::new(DayCursor::new(start, freq.multiple)),
        FrequencyUnit::Week => Box::new(DayCursor::new(
            start,
            freq.multiple
                .checked_mul(7)
                .ok_or_else(|| Error::InvalidFrequency(freq.to_string()))?,
        )),
        FrequencyUnit::SemiMonthStart => Box::new(SemiMonthCursor::new(start, multiple_u32(freq)?)?),
        FrequencyUnit::MonthEnd => Box::new(MonthEndCursor::new(start, multiple_u32(freq)?)?),
        FrequencyUnit::YearEnd => Box::new(YearCursor::year_end(start, multiple_u32(freq)?)?),
        FrequencyUnit::YearStart => Box::new(YearCursor::year_start(start, multiple_u32(freq)?)?),
        unit => {
            return Err(Error::UnsupportedFrequencyUnit {
                unit: unit.code().to_string(),
                reason: "date-only starts accept D, W, SM, M, Y and YS".to_string(),
            })
        }
    })
}

/// Cursor for a date-time start; only fixed-duration units are accepted
pub fn datetime_cursor(start: NaiveDateTime, freq: &Frequency) -> Result<Box<dyn CalendarCursor>> {
    if !freq.unit.is_calendar() || matches!(freq.unit, FrequencyUnit::Day | FrequencyUnit::Week) {
        let step = freq
            .fixed_duration()
            .ok_or_else(|| Error::InvalidFrequency(freq.to_string()))?;
        return Ok(Box::new(DurationCursor::new(start, step)));
    }
    Err(Error::UnsupportedFrequencyUnit {
        unit: freq.unit.code().to_string(),
        reason: "date-time starts accept D, W, H, T/min, S, L/ms, U/us and N/ns".to_string(),
    })
}
