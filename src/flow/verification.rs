use chrono::Duration;
use data_encoding::BASE64;
use log::{debug, info, warn};

use crate::api::{Api, Transport};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::api::auth::{
    FaceVerifyRequest, VoterLoginRequest, VoterOtpRequest, VoterOtpResponse,
};
use crate::model::auth::{AuthTokens, UserProfile, Voter};
use crate::model::election::{ElectionId, VoterElection};
use crate::model::otp::OtpEntry;
use crate::session::{SessionContext, Storage};
use crate::validation::{is_valid_email, require, ValidationErrors};

use super::otp_window;

/// Identity pair accepted by the server, plus the code being entered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpStage {
    voter_id: String,
    email: String,
    election_id: Option<ElectionId>,
    entry: OtpEntry,
}

impl OtpStage {
    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn election_id(&self) -> Option<&str> {
        self.election_id.as_deref()
    }

    pub fn entry(&self) -> &OtpEntry {
        &self.entry
    }

    fn verified_voter(&self) -> Voter {
        Voter {
            voter_id: self.voter_id.clone(),
            name: String::new(),
            email: self.email.clone(),
            has_voted: false,
            voted_at: None,
        }
    }
}

/// Holds the single-use face-verification token until it is spent.
#[derive(Clone, PartialEq)]
pub struct FaceStage {
    token: String,
    voter: Option<Voter>,
    election: Option<VoterElection>,
}

impl FaceStage {
    pub fn voter(&self) -> Option<&Voter> {
        self.voter.as_ref()
    }

    pub fn election(&self) -> Option<&VoterElection> {
        self.election.as_ref()
    }
}

impl std::fmt::Debug for FaceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceStage")
            .field("token", &"<redacted>")
            .field("voter", &self.voter)
            .field("election", &self.election)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    LoggedOut,
    AwaitingEmailOtp(OtpStage),
    AwaitingFaceVerification(FaceStage),
    Authenticated,
}

impl VerificationState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged out",
            Self::AwaitingEmailOtp(_) => "awaiting email OTP",
            Self::AwaitingFaceVerification(_) => "awaiting face verification",
            Self::Authenticated => "authenticated",
        }
    }
}

/// The voter's identity-verification state machine.
///
/// `LoggedOut -> AwaitingEmailOtp -> [AwaitingFaceVerification] -> Authenticated`
///
/// Each successful server response advances exactly one state. Transient
/// tokens live only inside the state and are consumed on use.
pub struct VerificationFlow<C = SystemClock> {
    clock: C,
    otp_ttl: Duration,
    face_similarity_threshold: u8,
    state: VerificationState,
    similarity: Option<f64>,
}

impl VerificationFlow<SystemClock> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(SystemClock, config)
    }
}

impl<C: Clock> VerificationFlow<C> {
    pub fn new(clock: C, config: &Config) -> Self {
        Self {
            clock,
            otp_ttl: config.otp_ttl(),
            face_similarity_threshold: config.face_similarity_threshold(),
            state: VerificationState::LoggedOut,
            similarity: None,
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    pub fn otp_stage(&self) -> Option<&OtpStage> {
        match &self.state {
            VerificationState::AwaitingEmailOtp(stage) => Some(stage),
            _ => None,
        }
    }

    pub fn face_stage(&self) -> Option<&FaceStage> {
        match &self.state {
            VerificationState::AwaitingFaceVerification(stage) => Some(stage),
            _ => None,
        }
    }

    /// Time left on the current code as `m:ss`.
    pub fn countdown_display(&self) -> Option<String> {
        self.otp_stage()
            .map(|stage| stage.entry.countdown().display(self.clock.now()))
    }

    pub fn can_resend(&self) -> bool {
        self.otp_stage()
            .map_or(false, |stage| stage.entry.can_resend(self.clock.now()))
    }

    /// Similarity reported by the last successful face verification.
    pub fn similarity(&self) -> Option<f64> {
        self.similarity
    }

    pub fn similarity_meets_threshold(&self) -> Option<bool> {
        self.similarity
            .map(|similarity| similarity >= f64::from(self.face_similarity_threshold))
    }

    fn transition(&mut self, next: VerificationState) {
        info!("Verification: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Submit the identity pair and start the OTP window.
    pub async fn initiate<T: Transport>(
        &mut self,
        api: &Api<T>,
        voter_id: &str,
        email: &str,
    ) -> Result<()> {
        if self.state != VerificationState::LoggedOut {
            return Err(Error::InvalidState(format!(
                "Cannot start a login while {}",
                self.state.name()
            )));
        }
        let voter_id = voter_id.trim();
        let email = email.trim();
        validate_voter_login(voter_id, email)?;

        let request = VoterLoginRequest {
            voter_id: voter_id.to_string(),
            email: email.to_string(),
        };
        let response = api.voter_login_initiate(&request).await?;

        let ttl = otp_window(response.expires_in, self.otp_ttl);
        let stage = OtpStage {
            voter_id: response.voter_id.unwrap_or(request.voter_id),
            email: request.email,
            election_id: response.election_id,
            entry: OtpEntry::start(self.clock.now(), ttl),
        };
        self.transition(VerificationState::AwaitingEmailOtp(stage));
        Ok(())
    }

    /// Replace the code typed so far.
    pub fn enter_code(&mut self, code: &str) -> Result<()> {
        match &mut self.state {
            VerificationState::AwaitingEmailOtp(stage) => {
                stage.entry.set_input(code);
                Ok(())
            }
            other => Err(Error::InvalidState(format!(
                "No code is expected while {}",
                other.name()
            ))),
        }
    }

    pub async fn submit_otp<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T>,
        session: &mut SessionContext<S>,
    ) -> Result<()> {
        let now = self.clock.now();
        let request = match &mut self.state {
            VerificationState::AwaitingEmailOtp(stage) => VoterOtpRequest {
                otp: stage.entry.checked_code(now)?,
                voter_id: stage.voter_id.clone(),
                election_id: stage.election_id.clone(),
            },
            other => {
                return Err(Error::InvalidState(format!(
                    "No code is expected while {}",
                    other.name()
                )))
            }
        };

        match api.voter_verify_otp(&request).await {
            Ok(response) => self.accept_otp(response, session),
            Err(e) if e.indicates_expiry() => {
                warn!("Verification window closed by server: {e}");
                self.transition(VerificationState::LoggedOut);
                Err(e)
            }
            Err(e) => {
                debug!("OTP rejected: {e}");
                Err(e)
            }
        }
    }

    fn accept_otp<S: Storage>(
        &mut self,
        response: VoterOtpResponse,
        session: &mut SessionContext<S>,
    ) -> Result<()> {
        if response.face_verification_required {
            let token = response
                .face_verification_token
                .filter(|token| !token.is_empty())
                .ok_or_else(|| incomplete("Face verification token missing from response"))?;
            self.transition(VerificationState::AwaitingFaceVerification(FaceStage {
                token,
                voter: response.voter,
                election: response.election,
            }));
            return Ok(());
        }

        let Some(access_token) = response.access_token.filter(|token| !token.is_empty()) else {
            return Err(incomplete("Verification response carried no session"));
        };
        // Without a profile in the response, the verified identity stands in.
        let voter = match (response.voter, &self.state) {
            (Some(voter), _) => voter,
            (None, VerificationState::AwaitingEmailOtp(stage)) => stage.verified_voter(),
            (None, _) => return Err(incomplete("Verification response carried no voter")),
        };
        session.establish(
            AuthTokens::new(access_token, response.refresh_token),
            UserProfile::Voter(voter),
            response.election,
        );
        self.transition(VerificationState::Authenticated);
        Ok(())
    }

    /// Request a fresh code once the current one has expired.
    pub async fn resend<T: Transport>(&mut self, api: &Api<T>) -> Result<()> {
        let now = self.clock.now();
        let request = match &self.state {
            VerificationState::AwaitingEmailOtp(stage) if stage.entry.can_resend(now) => {
                VoterLoginRequest {
                    voter_id: stage.voter_id.clone(),
                    email: stage.email.clone(),
                }
            }
            VerificationState::AwaitingEmailOtp(_) => {
                return Err(Error::InvalidState(
                    "A new code can be requested once the current one expires".to_string(),
                ))
            }
            other => {
                return Err(Error::InvalidState(format!(
                    "Cannot resend a code while {}",
                    other.name()
                )))
            }
        };

        let response = api.voter_login_initiate(&request).await?;
        let ttl = otp_window(response.expires_in, self.otp_ttl);
        let now = self.clock.now();
        if let VerificationState::AwaitingEmailOtp(stage) = &mut self.state {
            stage.entry.reset(now, ttl);
            if response.election_id.is_some() {
                stage.election_id = response.election_id;
            }
        }
        info!("Verification code resent");
        Ok(())
    }

    /// Send the captured image with the face-verification token.
    pub async fn submit_face<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T>,
        session: &mut SessionContext<S>,
        image: &[u8],
    ) -> Result<()> {
        let token = match &self.state {
            VerificationState::AwaitingFaceVerification(stage) => stage.token.clone(),
            other => {
                return Err(Error::InvalidState(format!(
                    "No face capture is expected while {}",
                    other.name()
                )))
            }
        };
        if image.is_empty() {
            return Err(ValidationErrors::single("face_image", "Please capture a photo"));
        }
        let request = FaceVerifyRequest {
            face_image: BASE64.encode(image),
            face_verification_token: token,
        };

        match api.voter_verify_face(&request).await {
            Ok(response) => {
                let election = match std::mem::replace(
                    &mut self.state,
                    VerificationState::Authenticated,
                ) {
                    VerificationState::AwaitingFaceVerification(stage) => stage.election,
                    _ => None,
                };
                info!("Verification: awaiting face verification -> authenticated");
                self.similarity = response.similarity;
                session.establish(response.tokens(), UserProfile::Voter(response.voter), election);
                Ok(())
            }
            Err(e) if e.indicates_expiry() => {
                warn!("Face verification window closed: {e}");
                self.transition(VerificationState::LoggedOut);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Abandon verification from any state and end the session.
    pub fn logout<S: Storage>(&mut self, session: &mut SessionContext<S>) {
        self.similarity = None;
        self.transition(VerificationState::LoggedOut);
        session.logout();
    }
}

fn incomplete(message: &str) -> Error {
    Error::Rejected {
        status: None,
        message: message.to_string(),
    }
}

pub fn validate_voter_login(voter_id: &str, email: &str) -> Result<()> {
    let mut errors = ValidationErrors::new();
    require(&mut errors, "voter_id", voter_id, "Voter ID is required");
    require(&mut errors, "email", email, "Email is required");
    if !email.trim().is_empty() && !is_valid_email(email.trim()) {
        errors.add("email", "Please enter a valid email address");
    }
    errors.into_result()
}
