//! Days-until-event countdown.
//!
//! A pure function plus a small wrapper the UI layer polls; there is no process-wide state.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::foundation::error::{RevealError, RevealResult};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until `target`, floored (negative once the date has passed).
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (target - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Parse a `YYYY-MM-DD` event date as midnight UTC.
pub fn parse_event_date(s: &str) -> RevealResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| RevealError::validation(format!("invalid event date '{s}': {e}")))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| RevealError::validation(format!("invalid event date '{s}'")))
}

/// Countdown to a fixed event; the caller decides when to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<Utc>,
}

impl Countdown {
    /// Count down to `target`.
    pub fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    /// The event instant.
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Days remaining at `now`.
    pub fn days(&self, now: DateTime<Utc>) -> i64 {
        days_until(self.target, now)
    }

    /// Next instant the day count can change: the following UTC midnight.
    pub fn next_refresh(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive()
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn counts_whole_days_with_floor() {
        let target = parse_event_date("2025-07-20").unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 10, 12, 0, 0).unwrap();
        assert_eq!(days_until(target, now), 9);
        assert_eq!(days_until(target, target), 0);
        let after = Utc.with_ymd_and_hms(2025, 7, 20, 0, 0, 1).unwrap();
        assert_eq!(days_until(target, after), -1);
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(parse_event_date("July 20").is_err());
        assert!(parse_event_date("2025-02-30").is_err());
    }

    #[test]
    fn next_refresh_is_following_midnight() {
        let c = Countdown::new(parse_event_date("2025-07-20").unwrap());
        let now = Utc.with_ymd_and_hms(2025, 7, 10, 23, 59, 0).unwrap();
        assert_eq!(
            c.next_refresh(now),
            Utc.with_ymd_and_hms(2025, 7, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(c.days(now), 9);
    }
}
