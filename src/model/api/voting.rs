use serde::{Deserialize, Serialize};

use crate::model::{
    ballot::VoteReceipt,
    election::{ElectionInfo, PositionCandidates},
};

/// `GET /voter/elections/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionInfoResponse {
    pub election: ElectionInfo,
}

/// `GET /voter/elections/:id/candidates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatesResponse {
    #[serde(default)]
    pub positions: Vec<PositionCandidates>,
}

/// `POST /voter/elections/:id/vote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteResponse {
    #[serde(default)]
    pub message: String,
    pub receipt: VoteReceipt,
}
