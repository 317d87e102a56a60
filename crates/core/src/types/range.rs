//! Half-open time ranges used to bucket sales for reporting.
//!
//! A [`TimeRange`] covers `[start, end)`. Day buckets are computed in an
//! explicit IANA timezone and converted to UTC instants, so a "day" in
//! `Asia/Jakarta` and a "day" in `UTC` are different ranges.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Search window for the first valid local instant of a day. DST gaps that
/// swallow midnight are at most a couple of hours wide.
const DAY_START_SEARCH_MINUTES: i64 = 180;
const DAY_START_SEARCH_STEP_MINUTES: i64 = 15;

/// Errors that can occur when constructing a [`TimeRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The range ends before it starts.
    #[error("range start {start} is after range end {end}")]
    Inverted {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
    /// The local day has no representable start in the given timezone.
    #[error("cannot determine the start of {date} in {tz}")]
    UnrepresentableDay {
        /// Calendar date.
        date: NaiveDate,
        /// Timezone the date was interpreted in.
        tz: Tz,
    },
}

/// A half-open interval of UTC instants, `[start, end)`.
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use kasir_core::TimeRange;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
/// let range = TimeRange::new(start, end).unwrap();
///
/// assert!(range.contains(start));
/// assert!(!range.contains(end));
/// assert!(TimeRange::new(end, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::Inverted` if `start` is after `end`. Equal bounds
    /// are accepted and describe an empty range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The single local calendar day `date` in timezone `tz`.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::UnrepresentableDay` if the day has no valid start.
    pub fn day(date: NaiveDate, tz: Tz) -> Result<Self, RangeError> {
        Self::days(date, date, tz)
    }

    /// Local calendar days `first` through `last`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::Inverted` if `last` is before `first`, or
    /// `RangeError::UnrepresentableDay` if a boundary day has no valid start.
    pub fn days(first: NaiveDate, last: NaiveDate, tz: Tz) -> Result<Self, RangeError> {
        let start = start_of_day(first, tz)?;
        let after_last = last
            .succ_opt()
            .ok_or(RangeError::UnrepresentableDay { date: last, tz })?;
        let end = start_of_day(after_last, tz)?;
        Self::new(start, end)
    }

    /// The local day containing `now` in timezone `tz`.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::UnrepresentableDay` if the day has no valid start.
    pub fn day_containing(now: DateTime<Utc>, tz: Tz) -> Result<Self, RangeError> {
        Self::day(now.with_timezone(&tz).date_naive(), tz)
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether the range covers no instants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `instant` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The first valid instant of local calendar day `date` in `tz`.
///
/// Normally local midnight. When a DST transition skips midnight, the first
/// local time after the gap is used; when midnight is ambiguous, the earlier
/// instant is used.
///
/// # Errors
///
/// Returns `RangeError::UnrepresentableDay` if no valid local time exists in
/// the first hours of the day.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, RangeError> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut offset = 0;
    while offset <= DAY_START_SEARCH_MINUTES {
        let local = midnight + Duration::minutes(offset);
        if let Some(instant) = tz.from_local_datetime(&local).earliest() {
            return Ok(instant.with_timezone(&Utc));
        }
        offset += DAY_START_SEARCH_STEP_MINUTES;
    }
    Err(RangeError::UnrepresentableDay { date, tz })
}
