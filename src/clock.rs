//! Local wall-clock handling.
//!
//! Everything is stored as UTC instants. Bucketing, manual entry and display
//! go through a fixed local offset (UTC+3 unless configured otherwise).

use crate::errors::TrackerError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DaySelector {
    #[default]
    Today,
    Yesterday,
}

#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::from_hours(DEFAULT_UTC_OFFSET_HOURS).unwrap_or_else(Self::utc)
    }
}

impl LocalClock {
    /// Returns `None` when the offset is outside +/-23 hours.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date_of(now)
    }

    pub fn local_date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn local_time_of(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.offset).time()
    }

    /// Absolute instant of the given local wall-clock moment. A fixed offset
    /// has no gaps or folds, so the mapping is always unique.
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        (local - self.offset).and_utc()
    }

    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date, NaiveTime::MIN)
    }

    /// Combines the selected local date with `time_of_day` and converts the
    /// result to UTC.
    pub fn resolve_local(
        &self,
        time_of_day: &str,
        day: DaySelector,
        now_local_date: NaiveDate,
    ) -> Result<DateTime<Utc>, TrackerError> {
        let time = parse_time_of_day(time_of_day)?;
        let date = match day {
            DaySelector::Today => now_local_date,
            DaySelector::Yesterday => now_local_date - Duration::days(1),
        };
        Ok(self.to_utc(date, time))
    }

    pub fn format_local(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%d.%m.%Y %H:%M")
            .to_string()
    }
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, TrackerError> {
    let trimmed = raw.trim();
    let invalid = || TrackerError::InvalidTimeFormat(trimmed.to_string());

    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| {
        !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(hours) || !digits(minutes) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Whole minutes between two instants, rounded toward zero.
pub fn elapsed_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().div_euclid(60)
}

pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours} h {mins} min")
    } else {
        format!("{mins} min")
    }
}
