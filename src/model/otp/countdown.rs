use chrono::{DateTime, Duration, Utc};

/// The validity window of an issued OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started_at: DateTime<Utc>,
    ttl: Duration,
}

impl Countdown {
    pub fn start(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            started_at: now,
            ttl,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.started_at + self.ttl
    }

    /// Time left, never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = self.expires_at() - now;
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }

    /// True once the countdown has reached zero.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) <= Duration::zero()
    }

    /// `m:ss`, as shown next to the code input.
    pub fn display(&self, now: DateTime<Utc>) -> String {
        let secs = self.remaining(now).num_seconds();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero() {
        let start = Utc::now();
        let countdown = Countdown::start(start, Duration::seconds(300));

        assert_eq!(countdown.display(start), "5:00");
        assert_eq!(countdown.display(start + Duration::seconds(61)), "3:59");
        assert!(!countdown.is_expired(start + Duration::seconds(299)));
        assert!(countdown.is_expired(start + Duration::seconds(300)));
        assert_eq!(countdown.remaining(start + Duration::hours(1)), Duration::zero());
        assert_eq!(countdown.display(start + Duration::hours(1)), "0:00");
    }
}
