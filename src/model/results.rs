use serde::{Deserialize, Serialize};

use crate::model::election::{CandidateId, ElectionId};

/// One candidate's standing in a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    pub votes: u64,
    pub percentage: f64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub candidate_id: CandidateId,
    pub name: String,
}

/// Tallies for a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionResult {
    pub position: String,
    pub total_votes: u64,
    #[serde(default)]
    pub candidates: Vec<CandidateResult>,
    /// Absent when nobody voted for this position.
    #[serde(default)]
    pub winner: Option<Winner>,
}

/// Headline turnout figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsElection {
    pub election_id: ElectionId,
    pub election_name: String,
    pub status: String,
    #[serde(default)]
    pub total_registered_voters: u64,
    #[serde(default)]
    pub total_votes_cast: u64,
    #[serde(default)]
    pub voter_turnout_percentage: f64,
}

/// `GET /elections/:id/results`. Results may legitimately be unavailable
/// while the election is still running; that is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election: ResultsElection,
    #[serde(default)]
    pub results: Vec<PositionResult>,
    #[serde(default)]
    pub results_available: bool,
    #[serde(default)]
    pub generated_at: Option<String>,
}

impl ElectionResults {
    /// Results for a given position, if published.
    pub fn position(&self, position: &str) -> Option<&PositionResult> {
        if !self.results_available {
            return None;
        }
        self.results.iter().find(|result| result.position == position)
    }
}

/// `value / total` as a percentage rounded to one decimal place.
pub fn percentage(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 1000.0).round() / 10.0
}
