//! Client-side state machines. Each has a single owner and only changes
//! state through its own operations.

use chrono::Duration;

pub mod admin;
pub mod eligibility;
pub mod verification;
pub mod voting;

pub use admin::{AdminFlow, AdminState};
pub use eligibility::Ineligible;
pub use verification::{VerificationFlow, VerificationState};
pub use voting::{Phase, Progress, Step, VotingFlow};

/// The server's stated OTP lifetime if it gave one, else the configured default.
fn otp_window(expires_in: Option<u32>, default: Duration) -> Duration {
    expires_in
        .filter(|secs| *secs > 0)
        .map_or(default, |secs| Duration::seconds(secs.into()))
}
