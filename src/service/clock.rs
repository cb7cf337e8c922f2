use chrono::{DateTime, Duration, NaiveTime, SubsecRound, Utc};

use crate::repository::TimeRange;

/// Source of "now". Injected so day rollover can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to the microsecond precision of `DATETIME(6)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

/// The UTC calendar day containing `at`.
pub fn utc_day(at: DateTime<Utc>) -> TimeRange {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    TimeRange {
        start,
        end: start + Duration::days(1),
    }
}

#[cfg(test)]
pub use test_clock::FixedClock;
