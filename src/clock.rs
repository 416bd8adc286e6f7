use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

// Source of the current time for rentals.
pub trait Clock: Send + Sync {
    fn utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Clock that only moves when told to. Used to replay rentals with
// synthetic timestamps.
#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock() = now;
    }

    pub fn advance(&self, delta: Duration) {
        *self.0.lock() += delta;
    }
}

impl Clock for ManualClock {
    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_moves_only_when_advanced() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.utc(), start);

        clock.advance(Duration::hours(2));
        assert_eq!(clock.utc(), start + Duration::hours(2));

        clock.set(start);
        assert_eq!(clock.utc(), start);
    }
}
