use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingTrend {
    pub time: String,
    pub votes: u64,
}

/// Live turnout for an election, polled by the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_voters: u64,
    pub votes_cast: u64,
    #[serde(default)]
    pub pending_votes: u64,
    #[serde(default)]
    pub turnout_percentage: f64,
    #[serde(default)]
    pub votes_by_position: BTreeMap<String, u64>,
    #[serde(default)]
    pub voting_trend: Vec<VotingTrend>,
    #[serde(default)]
    pub last_updated: Option<String>,
}
