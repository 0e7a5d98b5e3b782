use serde::{Deserialize, Serialize};

use super::CandidateId;

/// A person standing for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub manifesto: String,
}

/// One position on the ballot and everyone standing for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCandidates {
    pub position: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl PositionCandidates {
    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|candidate| candidate.candidate_id == candidate_id)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example(id: &str, position: &str) -> Self {
            Self {
                candidate_id: id.to_string(),
                name: format!("Candidate {id}"),
                position: position.to_string(),
                bio: String::new(),
                photo_url: String::new(),
                manifesto: String::new(),
            }
        }
    }

    impl PositionCandidates {
        /// President: c1, c4; Secretary: c2, c5; Treasurer: c3, c6.
        pub fn example_ballot() -> Vec<Self> {
            [("President", "c1", "c4"), ("Secretary", "c2", "c5"), ("Treasurer", "c3", "c6")]
                .into_iter()
                .map(|(position, a, b)| Self {
                    position: position.to_string(),
                    candidates: vec![
                        Candidate::example(a, position),
                        Candidate::example(b, position),
                    ],
                })
                .collect()
        }
    }
}
