use serde::{Deserialize, Serialize};

/// Proof that a ballot was accepted. Issued once by the server and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Vote ID.
    pub vote_id: String,
    /// When the server recorded the vote.
    pub timestamp: String,
    /// How many positions the ballot filled.
    pub positions_voted: u32,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoteReceipt {
        pub fn example() -> Self {
            Self {
                vote_id: "V100".to_string(),
                timestamp: "2026-10-14T09:30:00Z".to_string(),
                positions_voted: 2,
            }
        }
    }
}
