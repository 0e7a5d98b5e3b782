use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::validation::ValidationErrors;

pub mod code;
mod countdown;

pub use code::{Code, ParseError, LENGTH as CODE_LENGTH};
pub use countdown::Countdown;

/// The code-entry half of an OTP step: what the user has typed so far and the
/// window in which it may be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    countdown: Countdown,
    input: String,
    expired: bool,
}

impl OtpEntry {
    pub fn start(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            countdown: Countdown::start(now, ttl),
            input: String::new(),
            expired: false,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Whether a submission was already turned away because the window elapsed.
    pub fn was_expired(&self) -> bool {
        self.expired
    }

    /// Resend becomes available once the countdown reaches zero.
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        self.countdown.is_expired(now)
    }

    /// Start a fresh window after a new code was sent.
    pub fn reset(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.countdown = Countdown::start(now, ttl);
        self.input.clear();
        self.expired = false;
    }

    /// Check the current input is submittable at `now` and parse it.
    ///
    /// An elapsed window clears the input and marks the entry expired; the
    /// caller must not contact the server in that case.
    pub fn checked_code(&mut self, now: DateTime<Utc>) -> Result<Code> {
        if self.countdown.is_expired(now) {
            self.input.clear();
            self.expired = true;
            return Err(Error::Expired(
                "Code has expired. Please request a new one.".to_string(),
            ));
        }
        self.input.parse::<Code>().map_err(|err| {
            let message = match err {
                ParseError::InvalidLength(_) => {
                    format!("Please enter the {CODE_LENGTH}-digit code")
                }
                ParseError::InvalidChar(c) => {
                    format!("The code may only contain digits, found '{c}'")
                }
            };
            ValidationErrors::single("otp", message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_is_validation_error() {
        let now = Utc::now();
        let mut entry = OtpEntry::start(now, Duration::seconds(300));
        entry.set_input("12");
        assert!(matches!(entry.checked_code(now), Err(Error::Validation(_))));
        assert_eq!(entry.input(), "12");
        assert!(!entry.was_expired());
    }

    #[test]
    fn expired_entry_clears_input() {
        let now = Utc::now();
        let mut entry = OtpEntry::start(now, Duration::seconds(300));
        entry.set_input("123456");
        let later = now + Duration::seconds(301);

        assert!(matches!(entry.checked_code(later), Err(Error::Expired(_))));
        assert_eq!(entry.input(), "");
        assert!(entry.was_expired());
        assert!(entry.can_resend(later));

        entry.reset(later, Duration::seconds(120));
        assert_eq!(entry.countdown().expires_at(), later + Duration::seconds(120));
        assert!(!entry.was_expired());
        assert!(!entry.can_resend(later));
    }
}
