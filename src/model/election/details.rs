use serde::{Deserialize, Serialize};

use super::{ElectionId, ElectionStatus};

/// A position to be filled, as configured by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub position_name: String,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,
}

fn default_max_candidates() -> u32 {
    1
}

impl Position {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            position_name: name.into(),
            max_candidates: default_max_candidates(),
        }
    }
}

/// Headline numbers attached to an election description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectionCounts {
    pub total_voters: u32,
    pub total_candidates: u32,
    pub votes_cast: u32,
    pub voter_turnout: f64,
}

/// The full admin view of an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionDetails {
    pub election_id: ElectionId,
    pub election_name: String,
    #[serde(default)]
    pub description: String,
    pub status: ElectionStatus,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    pub election_start_time: String,
    pub election_end_time: String,
    #[serde(default)]
    pub result_announcement_time: Option<String>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub statistics: ElectionCounts,
}

/// A summary of an election, shorter than the full `ElectionDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub election_id: ElectionId,
    pub election_name: String,
    #[serde(default)]
    pub description: String,
    pub status: ElectionStatus,
    pub election_start_time: String,
    pub election_end_time: String,
    #[serde(default)]
    pub total_voters: u32,
    #[serde(default)]
    pub votes_cast: u32,
}
