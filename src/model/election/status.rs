use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// States in the Election lifecycle. The server owns these; the client only
/// ever requests a change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    /// Under construction, only visible to admins.
    Draft,
    /// Published and accepting voters.
    Active,
    /// Voting in progress.
    Ongoing,
    /// Voting closed, results not yet public.
    Concluded,
    /// Abandoned before voting began.
    Cancelled,
    /// Results are public.
    ResultsAnnounced,
}

impl ElectionStatus {
    pub const ALL: [ElectionStatus; 6] = [
        Self::Draft,
        Self::Active,
        Self::Ongoing,
        Self::Concluded,
        Self::Cancelled,
        Self::ResultsAnnounced,
    ];

    /// Whether ballots may be cast in this state.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active | Self::Ongoing)
    }

    /// The states an admin may move an election to from this one.
    pub fn next_states(&self) -> &'static [ElectionStatus] {
        match self {
            Self::Draft => &[Self::Active],
            Self::Active => &[Self::Ongoing, Self::Cancelled],
            Self::Ongoing => &[Self::Concluded],
            Self::Concluded => &[Self::ResultsAnnounced],
            Self::Cancelled | Self::ResultsAnnounced => &[],
        }
    }

    pub fn can_transition_to(&self, target: ElectionStatus) -> bool {
        self.next_states().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_states().is_empty()
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Ongoing => "Ongoing",
            Self::Concluded => "Concluded",
            Self::Cancelled => "Cancelled",
            Self::ResultsAnnounced => "Results Announced",
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Ongoing => "ongoing",
            Self::Concluded => "concluded",
            Self::Cancelled => "cancelled",
            Self::ResultsAnnounced => "results_announced",
        }
    }
}

impl Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown election status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for ElectionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
