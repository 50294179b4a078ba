//! Wall-clock source for the engine.
//!
//! The venue runs on a single fixed UTC offset, so local time is computed by
//! shifting UTC with a constant [`FixedOffset`]. There is no timezone database
//! and no DST handling.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Default venue offset: UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Current local time at the venue, in the forms the engine and displays use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    /// `HH:MM`
    pub hhmm: String,
    /// `HH:MM:SS`
    pub hhmmss: String,
    pub minutes_since_midnight: u32,
    /// Local calendar date, used for day detection.
    pub date: NaiveDate,
}

/// Source of "now" for the engine.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Offset applied to UTC to get venue-local time.
    fn offset(&self) -> FixedOffset;

    fn now(&self) -> ClockReading {
        reading_at(self.now_utc(), self.offset())
    }
}

/// Build a [`ClockReading`] for `at` shifted by `offset`.
pub fn reading_at(at: DateTime<Utc>, offset: FixedOffset) -> ClockReading {
    let local = at.with_timezone(&offset);
    let (h, m, s) = (local.hour(), local.minute(), local.second());
    ClockReading {
        hhmm: format!("{h:02}:{m:02}"),
        hhmmss: format!("{h:02}:{m:02}:{s:02}"),
        minutes_since_midnight: h * 60 + m,
        date: local.date_naive(),
    }
}

/// Convert an offset in minutes to a [`FixedOffset`].
///
/// Out-of-range values (beyond ±24h) fall back to UTC.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

/// The real system clock with a fixed venue offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset_minutes: i32) -> Self {
        Self {
            offset: offset_from_minutes(offset_minutes),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_MINUTES)
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock that only moves when told to.
///
/// Cloning yields a handle to the same instant, so a test can keep one handle
/// and advance time underneath an engine that owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, offset_minutes: i32) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
            offset: offset_from_minutes(offset_minutes),
        }
    }

    /// Clock pinned to a venue-local date and time.
    ///
    /// Returns `None` if the wall time is not representable.
    pub fn at_local(date: NaiveDate, hour: u32, minute: u32, offset_minutes: i32) -> Option<Self> {
        let offset = offset_from_minutes(offset_minutes);
        let local = date.and_hms_opt(hour, minute, 0)?;
        let utc = local.and_local_timezone(offset).single()?.with_timezone(&Utc);
        Some(Self::new(utc, offset_minutes))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = at;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reading_applies_venue_offset() {
        // 06:45:09 UTC is 12:15:09 at +05:30.
        let at = Utc.with_ymd_and_hms(2025, 9, 18, 6, 45, 9).unwrap();
        let r = reading_at(at, offset_from_minutes(330));
        assert_eq!(r.hhmm, "12:15");
        assert_eq!(r.hhmmss, "12:15:09");
        assert_eq!(r.minutes_since_midnight, 735);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 9, 18).unwrap());
    }

    #[test]
    fn offset_rolls_the_local_date_forward() {
        let at = Utc.with_ymd_and_hms(2025, 9, 18, 20, 0, 0).unwrap();
        let r = reading_at(at, offset_from_minutes(330));
        assert_eq!(r.hhmm, "01:30");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 9, 19).unwrap());
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(offset_from_minutes(100_000).local_minus_utc(), 0);
        assert_eq!(offset_from_minutes(-330).local_minus_utc(), -330 * 60);
    }

    #[test]
    fn manual_clock_handles_share_time() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 19).unwrap();
        let clock = ManualClock::at_local(date, 8, 0, 330).unwrap();
        let handle = clock.clone();
        handle.advance_minutes(45);
        assert_eq!(clock.now().hhmm, "08:45");
        assert_eq!(clock.now().minutes_since_midnight, 525);
    }
}
