use chrono::Duration;
use log::{info, warn};

use crate::api::{Api, Transport};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::api::auth::{AdminLoginRequest, AdminOtpRequest};
use crate::model::auth::UserProfile;
use crate::model::otp::OtpEntry;
use crate::session::{SessionContext, Storage};
use crate::validation::{require, ValidationErrors};

use super::otp_window;

/// Credentials accepted by the server, the session token it issued for the
/// OTP step, and the code being entered.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminOtpStage {
    credentials: AdminLoginRequest,
    session_token: String,
    entry: OtpEntry,
}

impl AdminOtpStage {
    pub fn username_or_email(&self) -> &str {
        &self.credentials.username_or_email
    }

    pub fn entry(&self) -> &OtpEntry {
        &self.entry
    }
}

impl std::fmt::Debug for AdminOtpStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminOtpStage")
            .field("username_or_email", &self.credentials.username_or_email)
            .field("session_token", &"<redacted>")
            .field("entry", &self.entry)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminState {
    LoggedOut,
    AwaitingOtp(AdminOtpStage),
    Authenticated,
}

impl AdminState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged out",
            Self::AwaitingOtp(_) => "awaiting OTP",
            Self::Authenticated => "authenticated",
        }
    }
}

/// `LoggedOut -> AwaitingOtp -> Authenticated` for administrators.
pub struct AdminFlow<C = SystemClock> {
    clock: C,
    otp_ttl: Duration,
    state: AdminState,
}

impl AdminFlow<SystemClock> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(SystemClock, config)
    }
}

impl<C: Clock> AdminFlow<C> {
    pub fn new(clock: C, config: &Config) -> Self {
        Self {
            clock,
            otp_ttl: config.otp_ttl(),
            state: AdminState::LoggedOut,
        }
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    pub fn otp_stage(&self) -> Option<&AdminOtpStage> {
        match &self.state {
            AdminState::AwaitingOtp(stage) => Some(stage),
            _ => None,
        }
    }

    pub fn countdown_display(&self) -> Option<String> {
        self.otp_stage()
            .map(|stage| stage.entry.countdown().display(self.clock.now()))
    }

    pub fn can_resend(&self) -> bool {
        self.otp_stage()
            .map_or(false, |stage| stage.entry.can_resend(self.clock.now()))
    }

    fn transition(&mut self, next: AdminState) {
        info!("Admin login: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    pub async fn login<T: Transport>(
        &mut self,
        api: &Api<T>,
        username_or_email: &str,
        password: &str,
    ) -> Result<()> {
        if self.state != AdminState::LoggedOut {
            return Err(Error::InvalidState(format!(
                "Cannot start a login while {}",
                self.state.name()
            )));
        }
        let mut errors = ValidationErrors::new();
        require(
            &mut errors,
            "username_or_email",
            username_or_email,
            "Username or email is required",
        );
        require(&mut errors, "password", password, "Password is required");
        errors.into_result()?;

        let credentials = AdminLoginRequest {
            username_or_email: username_or_email.trim().to_string(),
            password: password.to_string(),
        };
        let response = api.admin_login(&credentials).await?;
        let stage = AdminOtpStage {
            credentials,
            session_token: response.token,
            entry: OtpEntry::start(self.clock.now(), otp_window(response.expires_in, self.otp_ttl)),
        };
        self.transition(AdminState::AwaitingOtp(stage));
        Ok(())
    }

    pub fn enter_code(&mut self, code: &str) -> Result<()> {
        match &mut self.state {
            AdminState::AwaitingOtp(stage) => {
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
            AdminState::AwaitingOtp(stage) => AdminOtpRequest {
                otp: stage.entry.checked_code(now)?,
                session_token: stage.session_token.clone(),
            },
            other => {
                return Err(Error::InvalidState(format!(
                    "No code is expected while {}",
                    other.name()
                )))
            }
        };

        match api.admin_verify_otp(&request).await {
            Ok(response) => {
                // Dropping the stage discards the session token.
                self.transition(AdminState::Authenticated);
                session.establish(response.tokens(), UserProfile::Admin(response.admin), None);
                Ok(())
            }
            Err(e) if e.indicates_expiry() => {
                warn!("Admin verification window closed: {e}");
                self.transition(AdminState::LoggedOut);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn resend<T: Transport>(&mut self, api: &Api<T>) -> Result<()> {
        let now = self.clock.now();
        let credentials = match &self.state {
            AdminState::AwaitingOtp(stage) if stage.entry.can_resend(now) => {
                stage.credentials.clone()
            }
            AdminState::AwaitingOtp(_) => {
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

        let response = api.admin_login(&credentials).await?;
        let ttl = otp_window(response.expires_in, self.otp_ttl);
        let now = self.clock.now();
        if let AdminState::AwaitingOtp(stage) = &mut self.state {
            stage.session_token = response.token;
            stage.entry.reset(now, ttl);
        }
        info!("Admin verification code resent");
        Ok(())
    }

    pub fn logout<S: Storage>(&mut self, session: &mut SessionContext<S>) {
        self.transition(AdminState::LoggedOut);
        session.logout();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::session::MemoryStorage;
    use crate::testing::{ManualClock, MockTransport};

    fn admin_json() -> serde_json::Value {
        json!({"admin_id": "ADM-1", "username": "returning.officer", "email": "ro@school.ac.uk"})
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_locally() {
        let api = Api::new(MockTransport::new());
        let mut flow = AdminFlow::new(ManualClock::new(), &Config::default());

        match flow.login(&api, " ", "").await {
            Err(Error::Validation(errors)) => {
                assert_eq!(
                    errors.get("username_or_email"),
                    Some("Username or email is required")
                );
                assert_eq!(errors.get("password"), Some("Password is required"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(api.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn login_then_otp_establishes_admin_session() {
        let clock = ManualClock::new();
        let api = Api::new(MockTransport::new());
        let mut session = SessionContext::new(Arc::new(MemoryStorage::new()));
        let mut flow = AdminFlow::new(clock.clone(), &Config::default());

        api.transport().respond(
            200,
            json!({"success": true, "message": "OTP sent", "token": "sess-1", "expires_in": 600}),
        );
        flow.login(&api, "returning.officer", "hunter2").await.unwrap();
        assert_eq!(flow.countdown_display().as_deref(), Some("10:00"));

        api.transport().respond(
            200,
            json!({"success": true, "access_token": "admin-access", "refresh_token": "admin-refresh", "admin": admin_json()}),
        );
        flow.enter_code("246810").unwrap();
        flow.submit_otp(&api, &mut session).await.unwrap();

        assert_eq!(flow.state(), &AdminState::Authenticated);
        assert!(session.is_admin());
        assert_eq!(session.access_token(), Some("admin-access"));
        assert_eq!(
            api.transport().requests()[1].body,
            Some(json!({"session_token": "sess-1", "otp": "246810"}))
        );
    }

    #[tokio::test]
    async fn resend_replaces_the_session_token() {
        let clock = ManualClock::new();
        let api = Api::new(MockTransport::new());
        let mut session = SessionContext::new(Arc::new(MemoryStorage::new()));
        let mut flow = AdminFlow::new(clock.clone(), &Config::default());

        api.transport().respond(
            200,
            json!({"success": true, "token": "sess-1", "expires_in": 60}),
        );
        flow.login(&api, "returning.officer", "hunter2").await.unwrap();
        assert!(matches!(flow.resend(&api).await, Err(Error::InvalidState(_))));

        clock.advance(Duration::seconds(60));
        flow.enter_code("000000").unwrap();
        let err = flow.submit_otp(&api, &mut session).await.unwrap_err();
        assert!(matches!(err, Error::Expired(_)));
        assert!(flow.can_resend());

        api.transport().respond(
            200,
            json!({"success": true, "token": "sess-2", "expires_in": 60}),
        );
        flow.resend(&api).await.unwrap();
        assert!(!flow.can_resend());

        api.transport().respond(400, json!({"error": "Invalid OTP"}));
        flow.enter_code("123456").unwrap();
        flow.submit_otp(&api, &mut session).await.unwrap_err();
        let sent = api.transport().requests();
        assert_eq!(
            sent.last().unwrap().body,
            Some(json!({"session_token": "sess-2", "otp": "123456"}))
        );
        assert!(flow.otp_stage().is_some());
    }
}
