//! Time provider.
//! "Today" is re-derived on every call from the clock's current instant in
//! the site offset; nothing caches a date between requests.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Utc};
use std::sync::Mutex;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Site-local calendar date of `now()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// `time` on the calendar date of `instant`, in the same offset.
pub fn same_day_at(instant: DateTime<FixedOffset>, time: NaiveTime) -> DateTime<FixedOffset> {
    // A fixed offset has no gaps or folds: always a single mapping.
    instant
        .date_naive()
        .and_time(time)
        .and_local_timezone(*instant.offset())
        .single()
        .unwrap_or(instant)
}

/// Wall clock, read in the site's UTC offset.
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Use the host's local offset at each call.
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Use a fixed site offset (minutes east of UTC). Invalid offsets fall
    /// back to the host's local offset.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        Self {
            offset: minutes.checked_mul(60).and_then(FixedOffset::east_opt),
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(off) => Utc::now().with_timezone(&off),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Manually driven clock for deterministic date-boundary behaviour.
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Parse an RFC 3339 instant, e.g. "2025-03-10T08:00:00+08:00".
    pub fn at(rfc3339: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(rfc3339).ok().map(Self::new)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_offset_is_applied() {
        let clock = SystemClock::with_offset_minutes(8 * 60);
        assert_eq!(clock.offset(), FixedOffset::east_opt(8 * 3600));
        assert_eq!(clock.now().offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn oversized_offset_falls_back_to_local() {
        for minutes in [i32::MAX, i32::MIN, 24 * 60, -(24 * 60)] {
            let clock = SystemClock::with_offset_minutes(minutes);
            assert_eq!(clock.offset(), None, "{minutes}");
        }
    }

    #[test]
    fn same_day_at_keeps_the_instants_date() {
        let late = DateTime::parse_from_rfc3339("2025-03-10T23:59:59+08:00").unwrap();
        let t = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(
            same_day_at(late, t),
            DateTime::parse_from_rfc3339("2025-03-10T07:30:00+08:00").unwrap()
        );
    }

    #[test]
    fn fixed_clock_crosses_midnight() {
        let clock = FixedClock::at("2025-03-10T23:59:00+08:00").unwrap();
        clock.advance(Duration::minutes(1));
        assert_eq!(clock.today().to_string(), "2025-03-11");
    }
}
