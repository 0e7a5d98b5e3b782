//! The authenticated session and its persistence.

use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::api::BearerSource;
use crate::clock::Clock;
use crate::error::Result;
use crate::model::auth::{AuthTokens, UserProfile, UserType, Voter};
use crate::model::election::VoterElection;

mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

pub const TOKENS_KEY: &str = "votexpert_tokens";
pub const USER_KEY: &str = "votexpert_user";
pub const ELECTION_KEY: &str = "votexpert_election";

const ALL_KEYS: [&str; 3] = [TOKENS_KEY, USER_KEY, ELECTION_KEY];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub tokens: AuthTokens,
    pub user: UserProfile,
    pub election: Option<VoterElection>,
}

/// Sole owner of the current session. Memory is authoritative; storage
/// mirrors it so a restarted client can resume.
pub struct SessionContext<S> {
    storage: S,
    session: Option<Session>,
}

impl<S: Storage> SessionContext<S> {
    /// A context with nothing restored.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Restore any persisted session. Corrupt or expired data is discarded.
    pub fn init(storage: S, clock: &impl Clock) -> Self {
        let mut context = Self::new(storage);
        match context.restore() {
            Ok(Some(session)) if session.tokens.is_expired_at(clock.now()) => {
                info!("Persisted session has expired");
                context.teardown();
            }
            Ok(Some(session)) => {
                info!("Restored {} session", session.user.user_type());
                context.session = Some(session);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Discarding unreadable session: {e}");
                context.teardown();
            }
        }
        context
    }

    fn restore(&self) -> Result<Option<Session>> {
        let tokens = self.load::<AuthTokens>(TOKENS_KEY)?;
        let user = self.load::<UserProfile>(USER_KEY)?;
        let election = self.load::<VoterElection>(ELECTION_KEY)?;
        Ok(match (tokens, user) {
            (Some(tokens), Some(user)) => Some(Session {
                tokens,
                user,
                election,
            }),
            _ => None,
        })
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.storage.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.storage.set(key, &serde_json::to_string(value)?)
    }

    pub fn establish(
        &mut self,
        tokens: AuthTokens,
        user: UserProfile,
        election: Option<VoterElection>,
    ) {
        info!("Established {} session", user.user_type());
        self.session = Some(Session {
            tokens,
            user,
            election,
        });
        self.persist();
    }

    fn persist(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let result = self
            .store(TOKENS_KEY, &session.tokens)
            .and_then(|_| self.store(USER_KEY, &session.user))
            .and_then(|_| match &session.election {
                Some(election) => self.store(ELECTION_KEY, election),
                None => self.storage.remove(ELECTION_KEY),
            });
        if let Err(e) = result {
            warn!("Could not persist session: {e}");
        }
    }

    /// Replace the stored voter, e.g. once a ballot has been cast.
    pub fn update_voter(&mut self, voter: Voter) {
        if let Some(session) = &mut self.session {
            if matches!(session.user, UserProfile::Voter(_)) {
                session.user = UserProfile::Voter(voter);
                self.persist();
            }
        }
    }

    pub fn set_election(&mut self, election: VoterElection) {
        if let Some(session) = &mut self.session {
            session.election = Some(election);
            self.persist();
        }
    }

    pub fn logout(&mut self) {
        if self.session.is_some() {
            info!("Logged out");
        }
        self.teardown();
    }

    /// Clear memory and every persisted key.
    pub fn teardown(&mut self) {
        self.session = None;
        for key in ALL_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!("Could not remove {key}: {e}");
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_type() == Some(UserType::Admin)
    }

    pub fn is_voter(&self) -> bool {
        self.user_type() == Some(UserType::Voter)
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.session.as_ref().map(|s| s.user.user_type())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.tokens.access_token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn voter(&self) -> Option<&Voter> {
        self.user().and_then(UserProfile::as_voter)
    }

    pub fn election(&self) -> Option<&VoterElection> {
        self.session.as_ref().and_then(|s| s.election.as_ref())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> BearerSource for SessionContext<S> {
    fn bearer(&self) -> Option<&str> {
        self.access_token()
    }
}
