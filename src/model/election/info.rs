use serde::{Deserialize, Serialize};

use super::{ElectionId, ElectionStatus};

/// The election as a voter sees it, including their own eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionInfo {
    pub election_id: ElectionId,
    pub election_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub status: ElectionStatus,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub total_candidates: u32,
    #[serde(default)]
    pub voter_status: VoterStatus,
}

/// Where the signed-in voter stands in this election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub has_voted: bool,
    /// Absent means the server did not decide; the client then relies on
    /// status and `has_voted` alone.
    #[serde(default)]
    pub can_vote: Option<bool>,
    #[serde(default)]
    pub time_remaining: Option<String>,
}

/// The short election context handed back at the end of login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterElection {
    pub election_id: ElectionId,
    pub election_name: String,
    pub status: ElectionStatus,
}

impl From<&ElectionInfo> for VoterElection {
    fn from(info: &ElectionInfo) -> Self {
        Self {
            election_id: info.election_id.clone(),
            election_name: info.election_name.clone(),
            status: info.status,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ElectionInfo {
        pub fn example(status: ElectionStatus) -> Self {
            Self {
                election_id: "E1".to_string(),
                election_name: "Student Union 2026".to_string(),
                description: "Annual officer elections".to_string(),
                start_time: Some("2026-10-01T08:00:00Z".to_string()),
                end_time: Some("2026-10-31T18:00:00Z".to_string()),
                status,
                positions: vec![
                    "President".to_string(),
                    "Secretary".to_string(),
                    "Treasurer".to_string(),
                ],
                total_candidates: 6,
                voter_status: VoterStatus::default(),
            }
        }
    }
}
