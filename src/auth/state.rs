//! Sign-in state, driven by auth actor events

use super::provider::AccessToken;
use crate::error::ReplyError;
use crate::types::UserProfile;

/// Result of asking to start a login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStart {
    /// Caller should send `AuthCommand::Login` tagged with this attempt
    Started { attempt: u64 },
    /// A login is already running; nothing to do
    InFlight,
    AlreadySignedIn,
    /// No usable OAuth client id
    SetupRequired(ReplyError),
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    token: Option<AccessToken>,
    /// Token granted, profile not fetched yet
    pub loading: bool,
    pub login_in_flight: bool,
    provider_ready: bool,
    /// Id of the latest login attempt; events from older ones are ignored
    attempt: u64,
}

impl AuthState {
    pub fn new(provider_ready: bool) -> Self {
        Self {
            provider_ready,
            ..Default::default()
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn begin_login(&mut self) -> LoginStart {
        if !self.provider_ready {
            return LoginStart::SetupRequired(ReplyError::auth_setup_required());
        }
        if self.login_in_flight {
            return LoginStart::InFlight;
        }
        if self.user.is_some() {
            return LoginStart::AlreadySignedIn;
        }
        self.attempt += 1;
        self.login_in_flight = true;
        LoginStart::Started {
            attempt: self.attempt,
        }
    }

    /// Whether an event from `attempt` still belongs to the running login
    pub fn accepts(&self, attempt: u64) -> bool {
        self.login_in_flight && attempt == self.attempt
    }

    pub fn token_granted(&mut self) {
        self.loading = true;
    }

    pub fn logged_in(&mut self, user: UserProfile, token: AccessToken) {
        self.user = Some(user);
        self.token = Some(token);
        self.loading = false;
        self.login_in_flight = false;
    }

    /// Any failure during login leaves the state signed out
    pub fn login_failed(&mut self) {
        self.user = None;
        self.token = None;
        self.loading = false;
        self.login_in_flight = false;
    }

    /// Clear the session locally and abandon any running login; returns the
    /// token to revoke, if any
    pub fn logout(&mut self) -> Option<AccessToken> {
        self.user = None;
        self.loading = false;
        self.login_in_flight = false;
        self.token.take()
    }
}
