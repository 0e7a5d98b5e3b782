use std::fmt::{Display, Formatter};

use crate::model::election::{ElectionInfo, ElectionStatus};

/// Why a voter cannot cast a ballot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ineligible {
    ElectionNotOpen(ElectionStatus),
    AlreadyVoted,
    /// The server reported `can_vote = false` for another reason.
    NotPermitted,
    NoPositions,
}

impl Display for Ineligible {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElectionNotOpen(status) => {
                write!(f, "Voting is not open for this election ({})", status.label())
            }
            Self::AlreadyVoted => write!(f, "You have already voted in this election"),
            Self::NotPermitted => write!(f, "You are not eligible to vote in this election"),
            Self::NoPositions => write!(f, "This election has no positions to vote on"),
        }
    }
}

/// Check the voter may enter the booth for `election`.
pub fn check(election: &ElectionInfo) -> Result<(), Ineligible> {
    if !election.status.accepts_votes() {
        return Err(Ineligible::ElectionNotOpen(election.status));
    }
    if election.voter_status.has_voted {
        return Err(Ineligible::AlreadyVoted);
    }
    if election.voter_status.can_vote == Some(false) {
        return Err(Ineligible::NotPermitted);
    }
    Ok(())
}
