use serde::{Deserialize, Serialize};

use crate::model::{
    election::{ElectionDetails, ElectionId, ElectionStatus, ElectionSummary},
    statistics::Statistics,
};

/// `PATCH /admin/elections/:id/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ElectionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub election_id: ElectionId,
    pub status: ElectionStatus,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionListResponse {
    #[serde(default)]
    pub elections: Vec<ElectionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionDetailsResponse {
    pub election: ElectionDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub statistics: Statistics,
}

/// A candidate as listed across all elections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCandidate {
    pub candidate_id: String,
    pub name: String,
    pub position: String,
    pub election_id: ElectionId,
    #[serde(default)]
    pub election_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCandidatesResponse {
    #[serde(default)]
    pub candidates: Vec<AdminCandidate>,
}

/// A voter as listed across all elections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminVoter {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub election_id: ElectionId,
    #[serde(default)]
    pub election_name: String,
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminVotersResponse {
    #[serde(default)]
    pub voters: Vec<AdminVoter>,
}
