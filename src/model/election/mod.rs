mod candidate;
mod details;
mod info;
mod spec;
mod status;

pub use candidate::{Candidate, PositionCandidates};
pub use details::{ElectionCounts, ElectionDetails, ElectionSummary, Position};
pub use info::{ElectionInfo, VoterElection, VoterStatus};
pub use spec::{CreateElectionRequest, CreateElectionResponse, ElectionSpec};
pub use status::{ElectionStatus, UnknownStatus};

/// Election IDs are opaque server-issued strings.
pub type ElectionId = String;
/// Candidate IDs are opaque server-issued strings.
pub type CandidateId = String;
/// Positions are identified by their name.
pub type PositionName = String;
