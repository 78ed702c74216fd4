//! 時系列データ操作のためのモジュール
//!
//! Frequency strings, calendar stepping, date-range generation, binning of
//! sorted timestamps and resampling of time-indexed frames.

pub mod bins;
pub mod calendar;
mod date_range;
mod frequency;
mod resample;

pub use self::bins::{bin_counts, generate_bins};
pub use self::calendar::CalendarCursor;
pub use self::date_range::{date_range, datetime_range, RangeBound};
pub use self::frequency::{split_time_span, Frequency, FrequencyUnit};
pub use self::resample::{resample, ResampleOptions, MIN_RESAMPLE_ROWS, RESAMPLE_KEY};
