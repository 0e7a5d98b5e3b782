use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::election::{CandidateId, ElectionId, PositionName};

mod receipt;

pub use receipt::VoteReceipt;

/// A voter's choices for one election: at most one candidate per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    election_id: ElectionId,
    votes: BTreeMap<PositionName, CandidateId>,
}

impl Ballot {
    pub fn new(election_id: impl Into<ElectionId>) -> Self {
        Self {
            election_id: election_id.into(),
            votes: BTreeMap::new(),
        }
    }

    pub fn election_id(&self) -> &str {
        &self.election_id
    }

    /// Record a choice, replacing any earlier choice for the same position.
    /// Returns the replaced candidate.
    pub fn select(&mut self, position: &str, candidate: &str) -> Option<CandidateId> {
        self.votes.insert(position.to_string(), candidate.to_string())
    }

    /// Clear the choice for a position, turning it back into an abstention.
    pub fn deselect(&mut self, position: &str) -> Option<CandidateId> {
        self.votes.remove(position)
    }

    pub fn choice(&self, position: &str) -> Option<&str> {
        self.votes.get(position).map(String::as_str)
    }

    pub fn filled(&self) -> usize {
        self.votes.len()
    }

    pub fn votes(&self) -> &BTreeMap<PositionName, CandidateId> {
        &self.votes
    }

    /// The request body for casting this ballot.
    pub fn to_payload(&self) -> VotePayload {
        VotePayload {
            votes: self.votes.clone(),
        }
    }
}

/// `POST /voter/elections/:id/vote` body. Positions absent from `votes` are abstentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePayload {
    pub votes: BTreeMap<PositionName, CandidateId>,
}
