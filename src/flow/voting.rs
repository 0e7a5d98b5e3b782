use std::fmt::{Display, Formatter};

use log::{debug, info, warn};

use crate::api::{Api, Transport};
use crate::error::{DisplayMessage, Error, Result};
use crate::model::ballot::{Ballot, VotePayload, VoteReceipt};
use crate::model::election::{CandidateId, ElectionId, ElectionInfo, PositionCandidates};
use crate::session::{SessionContext, Storage};
use crate::validation::ValidationErrors;

use super::eligibility::{self, Ineligible};

/// The booth screen currently shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Position(usize),
    Reviewing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Terminal: the booth was never opened.
    CannotVote(Ineligible),
    Voting(Step),
    /// A ballot is in flight. Nothing may change until it resolves.
    Submitting,
    /// Terminal: the server accepted the ballot.
    Completed(VoteReceipt),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Progress {
    pub filled: usize,
    pub total: usize,
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.filled, self.total)
    }
}

/// The ballot-casting state machine for one election.
///
/// Positions are visited in order, followed by a review step from which the
/// ballot is submitted. Unfilled positions are abstentions.
#[derive(Debug)]
pub struct VotingFlow {
    election_id: ElectionId,
    election_name: String,
    positions: Vec<PositionCandidates>,
    ballot: Ballot,
    phase: Phase,
    last_error: Option<String>,
    receipt_taken: bool,
}

impl VotingFlow {
    /// Open the booth, or create a terminal flow if the voter may not vote.
    pub fn begin(election: &ElectionInfo, positions: Vec<PositionCandidates>) -> Self {
        let phase = match eligibility::check(election) {
            Err(reason) => Phase::CannotVote(reason),
            Ok(()) if positions.is_empty() => Phase::CannotVote(Ineligible::NoPositions),
            Ok(()) => Phase::Voting(Step::Position(0)),
        };
        match &phase {
            Phase::CannotVote(reason) => info!("Booth closed for {}: {reason}", election.election_id),
            _ => info!(
                "Booth opened for {} with {} positions",
                election.election_id,
                positions.len()
            ),
        }
        Self {
            election_id: election.election_id.clone(),
            election_name: election.election_name.clone(),
            positions,
            ballot: Ballot::new(election.election_id.clone()),
            phase,
            last_error: None,
            receipt_taken: false,
        }
    }

    pub fn election_id(&self) -> &str {
        &self.election_id
    }

    pub fn election_name(&self) -> &str {
        &self.election_name
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn step(&self) -> Option<Step> {
        match self.phase {
            Phase::Voting(step) => Some(step),
            _ => None,
        }
    }

    pub fn ineligible(&self) -> Option<Ineligible> {
        match self.phase {
            Phase::CannotVote(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn positions(&self) -> &[PositionCandidates] {
        &self.positions
    }

    /// The position shown at the current step, if any.
    pub fn current_position(&self) -> Option<&PositionCandidates> {
        match self.step() {
            Some(Step::Position(index)) => self.positions.get(index),
            _ => None,
        }
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            filled: self.ballot.filled(),
            total: self.positions.len(),
        }
    }

    /// Positions left without a choice, in ballot order.
    pub fn abstentions(&self) -> Vec<&str> {
        self.positions
            .iter()
            .map(|p| p.position.as_str())
            .filter(|position| self.ballot.choice(position).is_none())
            .collect()
    }

    fn ensure_open(&self) -> Result<Step> {
        match &self.phase {
            Phase::Voting(step) => Ok(*step),
            Phase::Submitting => Err(Error::SubmissionPending),
            Phase::CannotVote(reason) => Err(Error::InvalidState(reason.to_string())),
            Phase::Completed(_) => Err(Error::InvalidState(
                "This ballot has already been cast".to_string(),
            )),
        }
    }

    fn set_step(&mut self, step: Step) -> Step {
        debug!("Booth step {:?} -> {step:?}", self.step());
        self.phase = Phase::Voting(step);
        step
    }

    /// Choose `candidate_id` for `position`, replacing any earlier choice.
    /// Returns the replaced candidate.
    pub fn select_candidate(
        &mut self,
        position: &str,
        candidate_id: &str,
    ) -> Result<Option<CandidateId>> {
        self.ensure_open()?;
        let group = self
            .positions
            .iter()
            .find(|p| p.position == position)
            .ok_or_else(|| {
                ValidationErrors::single("position", format!("Unknown position '{position}'"))
            })?;
        if group.candidate(candidate_id).is_none() {
            return Err(ValidationErrors::single(
                "candidate_id",
                format!("'{candidate_id}' is not standing for {position}"),
            ));
        }
        Ok(self.ballot.select(position, candidate_id))
    }

    /// Choose for the position shown at the current step.
    pub fn select_current(&mut self, candidate_id: &str) -> Result<Option<CandidateId>> {
        let position = self
            .current_position()
            .map(|p| p.position.clone())
            .ok_or_else(|| Error::InvalidState("No position is being shown".to_string()))?;
        self.select_candidate(&position, candidate_id)
    }

    pub fn deselect(&mut self, position: &str) -> Result<Option<CandidateId>> {
        self.ensure_open()?;
        Ok(self.ballot.deselect(position))
    }

    /// Advance one step; the last position leads to review.
    pub fn next(&mut self) -> Result<Step> {
        let next = match self.ensure_open()? {
            Step::Position(index) if index + 1 >= self.positions.len() => Step::Reviewing,
            Step::Position(index) => Step::Position(index + 1),
            Step::Reviewing => {
                return Err(Error::InvalidState("Already reviewing the ballot".to_string()))
            }
        };
        Ok(self.set_step(next))
    }

    /// Go back one step, stopping at the first position.
    pub fn previous(&mut self) -> Result<Step> {
        let previous = match self.ensure_open()? {
            Step::Reviewing => Step::Position(self.positions.len().saturating_sub(1)),
            Step::Position(index) => Step::Position(index.saturating_sub(1)),
        };
        Ok(self.set_step(previous))
    }

    /// Jump to a position, e.g. to change a choice from the review step.
    pub fn go_to(&mut self, index: usize) -> Result<Step> {
        self.ensure_open()?;
        if index >= self.positions.len() {
            return Err(ValidationErrors::single(
                "position",
                format!("There is no position {}", index + 1),
            ));
        }
        Ok(self.set_step(Step::Position(index)))
    }

    /// Lock the ballot and hand out the body to send.
    pub fn begin_submit(&mut self) -> Result<VotePayload> {
        if self.ensure_open()? != Step::Reviewing {
            return Err(Error::InvalidState(
                "Review the ballot before submitting".to_string(),
            ));
        }
        self.phase = Phase::Submitting;
        self.last_error = None;
        info!(
            "Submitting ballot for {} ({} abstentions)",
            self.election_id,
            self.abstentions().len()
        );
        Ok(self.ballot.to_payload())
    }

    /// Apply the outcome of the submission started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, outcome: Result<VoteReceipt>) -> Result<()> {
        if self.phase != Phase::Submitting {
            return Err(Error::InvalidState("No submission is in progress".to_string()));
        }
        match outcome {
            Ok(receipt) => {
                info!("Ballot accepted as {}", receipt.vote_id);
                self.phase = Phase::Completed(receipt);
                Ok(())
            }
            Err(e) => {
                warn!("Ballot submission failed: {e}");
                self.last_error = Some(DisplayMessage(&e).to_string());
                self.phase = Phase::Voting(Step::Reviewing);
                Err(e)
            }
        }
    }

    /// Return a submission whose outcome will never arrive to review, with
    /// the ballot intact. The server may still have recorded the vote.
    pub fn abandon_submit(&mut self) -> Result<Step> {
        if self.phase != Phase::Submitting {
            return Err(Error::InvalidState("No submission is in progress".to_string()));
        }
        warn!("Ballot submission for {} abandoned", self.election_id);
        Ok(self.set_step(Step::Reviewing))
    }

    /// Send the ballot once and record the voter as having voted.
    ///
    /// Dropping the returned future before it completes leaves the flow in
    /// [`Phase::Submitting`]; call [`abandon_submit`](Self::abandon_submit)
    /// to recover.
    pub async fn submit<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T>,
        session: &mut SessionContext<S>,
    ) -> Result<()> {
        let payload = self.begin_submit()?;
        let outcome = api
            .cast_vote(&*session, &self.election_id, &payload)
            .await
            .map(|response| response.receipt);

        if let Ok(receipt) = &outcome {
            if let Some(voter) = session.voter() {
                let mut voter = voter.clone();
                voter.has_voted = true;
                voter.voted_at = Some(receipt.timestamp.clone());
                session.update_voter(voter);
            }
        }
        self.finish_submit(outcome)
    }

    pub fn receipt(&self) -> Option<&VoteReceipt> {
        match &self.phase {
            Phase::Completed(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// The receipt for display. Handed out once.
    pub fn take_receipt(&mut self) -> Option<VoteReceipt> {
        if self.receipt_taken {
            return None;
        }
        let receipt = self.receipt().cloned();
        self.receipt_taken = receipt.is_some();
        receipt
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::model::auth::{AuthTokens, UserProfile, Voter};
    use crate::model::election::ElectionStatus;
    use crate::session::MemoryStorage;
    use crate::testing::MockTransport;

    fn open_booth() -> VotingFlow {
        VotingFlow::begin(
            &ElectionInfo::example(ElectionStatus::Active),
            PositionCandidates::example_ballot(),
        )
    }

    fn voter_session() -> SessionContext<Arc<MemoryStorage>> {
        let mut session = SessionContext::new(Arc::new(MemoryStorage::new()));
        session.establish(
            AuthTokens::new("access", None),
            UserProfile::Voter(Voter::example()),
            None,
        );
        session
    }

    #[test]
    fn ineligible_voter_gets_terminal_flow() {
        let mut election = ElectionInfo::example(ElectionStatus::Ongoing);
        election.voter_status.has_voted = true;
        let mut flow = VotingFlow::begin(&election, PositionCandidates::example_ballot());

        assert_eq!(flow.ineligible(), Some(Ineligible::AlreadyVoted));
        assert!(matches!(flow.select_candidate("President", "c1"), Err(Error::InvalidState(_))));
        assert!(matches!(flow.next(), Err(Error::InvalidState(_))));
        assert!(matches!(flow.begin_submit(), Err(Error::InvalidState(_))));

        let concluded = VotingFlow::begin(
            &ElectionInfo::example(ElectionStatus::Concluded),
            PositionCandidates::example_ballot(),
        );
        assert_eq!(
            concluded.ineligible(),
            Some(Ineligible::ElectionNotOpen(ElectionStatus::Concluded))
        );

        let empty = VotingFlow::begin(&ElectionInfo::example(ElectionStatus::Active), vec![]);
        assert_eq!(empty.ineligible(), Some(Ineligible::NoPositions));
    }

    #[test]
    fn last_selection_wins() {
        let mut flow = open_booth();
        assert_eq!(flow.select_candidate("President", "c1").unwrap(), None);
        assert_eq!(
            flow.select_candidate("President", "c4").unwrap().as_deref(),
            Some("c1")
        );
        assert_eq!(flow.ballot().choice("President"), Some("c4"));
        assert_eq!(flow.ballot().votes().len(), 1);
    }

    #[test]
    fn unknown_choices_are_validation_errors() {
        let mut flow = open_booth();
        assert!(matches!(
            flow.select_candidate("Dean", "c1"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            flow.select_candidate("President", "c2"),
            Err(Error::Validation(_))
        ));
        assert_eq!(flow.progress().filled, 0);
    }

    #[test]
    fn navigation_wraps_into_review() {
        let mut flow = open_booth();
        assert_eq!(flow.previous().unwrap(), Step::Position(0));
        assert_eq!(flow.next().unwrap(), Step::Position(1));
        assert_eq!(flow.next().unwrap(), Step::Position(2));
        assert_eq!(flow.next().unwrap(), Step::Reviewing);
        assert!(flow.next().is_err());
        assert_eq!(flow.previous().unwrap(), Step::Position(2));
        assert_eq!(
            flow.current_position().map(|p| p.position.as_str()),
            Some("Treasurer")
        );
        assert_eq!(flow.go_to(0).unwrap(), Step::Position(0));
        assert!(flow.go_to(3).is_err());
    }

    #[test]
    fn partial_ballot_reports_abstentions() {
        let mut flow = open_booth();
        flow.select_current("c1").unwrap();
        flow.next().unwrap();
        flow.next().unwrap();
        flow.select_current("c3").unwrap();

        assert_eq!(flow.progress().to_string(), "2 of 3");
        assert_eq!(flow.abstentions(), vec!["Secretary"]);
    }

    #[test]
    fn submission_locks_the_ballot() {
        let mut flow = open_booth();
        flow.select_candidate("President", "c1").unwrap();
        assert!(matches!(flow.begin_submit(), Err(Error::InvalidState(_))));

        flow.go_to(2).unwrap();
        flow.next().unwrap();
        let payload = flow.begin_submit().unwrap();
        assert_eq!(payload.votes.len(), 1);

        assert!(matches!(flow.begin_submit(), Err(Error::SubmissionPending)));
        assert!(matches!(
            flow.select_candidate("Secretary", "c2"),
            Err(Error::SubmissionPending)
        ));
        assert!(matches!(flow.deselect("President"), Err(Error::SubmissionPending)));

        let err = Error::Network("connection reset".to_string());
        flow.finish_submit(Err(err)).unwrap_err();
        assert_eq!(flow.step(), Some(Step::Reviewing));
        assert_eq!(flow.last_error(), Some(crate::error::GENERIC_ERROR_MESSAGE));
        assert_eq!(flow.ballot().choice("President"), Some("c1"));
    }

    #[test]
    fn abandoned_submission_returns_to_review() {
        let mut flow = open_booth();
        assert!(matches!(flow.abandon_submit(), Err(Error::InvalidState(_))));

        flow.select_candidate("President", "c1").unwrap();
        flow.go_to(2).unwrap();
        flow.next().unwrap();
        flow.begin_submit().unwrap();
        assert!(matches!(flow.next(), Err(Error::SubmissionPending)));

        assert_eq!(flow.abandon_submit().unwrap(), Step::Reviewing);
        assert_eq!(flow.ballot().choice("President"), Some("c1"));
        flow.begin_submit().unwrap();
        assert_eq!(flow.phase(), &Phase::Submitting);
    }

    #[test]
    fn completed_ballot_is_immutable() {
        let mut flow = open_booth();
        flow.go_to(2).unwrap();
        flow.next().unwrap();
        flow.begin_submit().unwrap();
        flow.finish_submit(Ok(VoteReceipt::example())).unwrap();

        assert!(matches!(flow.phase(), Phase::Completed(_)));
        assert!(matches!(flow.previous(), Err(Error::InvalidState(_))));
        assert_eq!(flow.take_receipt(), Some(VoteReceipt::example()));
        assert_eq!(flow.take_receipt(), None);
        assert_eq!(flow.receipt(), Some(&VoteReceipt::example()));
    }

    #[tokio::test]
    async fn submit_sends_selected_votes_once() {
        let api = Api::new(MockTransport::new());
        let mut session = voter_session();
        let mut flow = open_booth();
        flow.select_candidate("President", "c4").unwrap();
        flow.select_candidate("Treasurer", "c3").unwrap();
        flow.go_to(2).unwrap();
        flow.next().unwrap();

        api.transport().respond(
            200,
            json!({
                "success": true,
                "message": "Vote cast",
                "receipt": {"vote_id": "V100", "timestamp": "2026-10-14T09:30:00Z", "positions_voted": 2}
            }),
        );
        flow.submit(&api, &mut session).await.unwrap();

        let sent = api.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/voter/elections/E1/vote");
        assert_eq!(sent[0].bearer.as_deref(), Some("access"));
        assert_eq!(
            sent[0].body,
            Some(json!({"votes": {"President": "c4", "Treasurer": "c3"}}))
        );
        assert_eq!(flow.receipt().map(|r| r.positions_voted), Some(2));
        assert_eq!(session.voter().map(|v| v.has_voted), Some(true));

        assert!(flow.submit(&api, &mut session).await.is_err());
        assert_eq!(api.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn rejected_submission_returns_to_review() {
        let api = Api::new(MockTransport::new());
        let mut session = voter_session();
        let mut flow = open_booth();
        flow.go_to(2).unwrap();
        flow.next().unwrap();

        api.transport()
            .respond(403, json!({"success": false, "error": "Voter has already voted"}));
        flow.submit(&api, &mut session).await.unwrap_err();

        assert_eq!(flow.step(), Some(Step::Reviewing));
        assert_eq!(flow.last_error(), Some("Voter has already voted"));
        assert_eq!(session.voter().map(|v| v.has_voted), Some(false));
    }
}
