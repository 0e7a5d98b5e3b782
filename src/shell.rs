//! Session-expiry handling and route selection for a front end.

use log::{info, warn};

use crate::error::{DisplayMessage, Error, Result};
use crate::flow::VerificationState;
use crate::session::{SessionContext, Storage};

pub mod routes {
    pub const HOME: &str = "/";

    pub const VOTER_LOGIN: &str = "/voter/login";
    pub const VOTER_OTP: &str = "/voter/otp";
    pub const VOTER_FACE_VERIFICATION: &str = "/voter/face-verification";
    pub const VOTER_ELECTIONS: &str = "/voter/elections";
    pub const VOTER_VOTE: &str = "/voter/elections/:electionId/vote";
    pub const VOTER_SUCCESS: &str = "/voter/elections/:electionId/success";
    pub const VOTER_RESULTS: &str = "/voter/results/:electionId";

    pub const ADMIN_LOGIN: &str = "/admin/login";
    pub const ADMIN_OTP: &str = "/admin/otp";
    pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
    pub const ADMIN_ELECTIONS: &str = "/admin/elections";
    pub const ADMIN_CREATE_ELECTION: &str = "/admin/elections/create";
    pub const ADMIN_ELECTION_DETAILS: &str = "/admin/elections/:electionId";
    pub const ADMIN_ELECTION_STATISTICS: &str = "/admin/elections/:electionId/statistics";

    /// Fill the `:electionId` segment of a route template.
    pub fn for_election(template: &str, election_id: &str) -> String {
        template.replace(":electionId", election_id)
    }
}

/// Where to send a user whose session has ended while on `path`.
pub fn login_route_for(path: &str) -> &'static str {
    if path.starts_with("/admin") {
        routes::ADMIN_LOGIN
    } else {
        routes::VOTER_LOGIN
    }
}

/// The screen that matches a verification state.
pub fn verification_route(state: &VerificationState) -> &'static str {
    match state {
        VerificationState::LoggedOut => routes::VOTER_LOGIN,
        VerificationState::AwaitingEmailOtp(_) => routes::VOTER_OTP,
        VerificationState::AwaitingFaceVerification(_) => routes::VOTER_FACE_VERIFICATION,
        VerificationState::Authenticated => routes::VOTER_ELECTIONS,
    }
}

#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),
    /// Show inline. Nothing was torn down.
    Failed(Error),
    /// The session ended; navigate here.
    Redirect(&'static str),
}

impl<T> Outcome<T> {
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Failed(e) => Err(e),
            Self::Redirect(route) => Err(Error::Unauthorized(format!(
                "Session ended, continue at {route}"
            ))),
        }
    }
}

/// Owns the session and the current location; the one place that reacts
/// to an expired session.
pub struct AppShell<S> {
    session: SessionContext<S>,
    current_path: String,
}

impl<S: Storage> AppShell<S> {
    pub fn new(session: SessionContext<S>) -> Self {
        Self {
            session,
            current_path: routes::HOME.to_string(),
        }
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext<S> {
        &mut self.session
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
        info!("Navigated to {}", self.current_path);
    }

    /// Route an operation's result. Unauthorized tears the session down and
    /// redirects to the login matching the current path.
    pub fn resolve<T>(&mut self, result: Result<T>) -> Outcome<T> {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(e) if e.is_session_expiry() => {
                let route = login_route_for(&self.current_path);
                warn!("Session expired on {}: {e}", self.current_path);
                self.session.teardown();
                self.navigate(route);
                Outcome::Redirect(route)
            }
            Err(e) => {
                info!("Operation failed: {}", DisplayMessage(&e));
                Outcome::Failed(e)
            }
        }
    }

    /// The login route to visit if the current path needs a session of a
    /// kind that is not held.
    pub fn guard(&self) -> Option<&'static str> {
        let path = self.current_path.as_str();
        let allowed = if is_public(path) {
            true
        } else if path.starts_with("/admin") {
            self.session.is_admin()
        } else if path.starts_with("/voter") {
            self.session.is_voter()
        } else {
            true
        };
        (!allowed).then(|| login_route_for(path))
    }
}

fn is_public(path: &str) -> bool {
    [
        routes::HOME,
        routes::VOTER_LOGIN,
        routes::VOTER_OTP,
        routes::VOTER_FACE_VERIFICATION,
        routes::ADMIN_LOGIN,
        routes::ADMIN_OTP,
    ]
    .contains(&path)
        || path.starts_with("/voter/results/")
}
