//! Authentication session lifecycle.
//!
//! The session is the only owner of the bearer token. Requests that need it
//! borrow it through [`SessionManager::bearer`] and pass it to the API
//! client explicitly.

use std::fmt;

use anyhow::Result;
use log::{debug, error, info, warn};

use crate::api::PortalApi;
use crate::models::{AuthResponse, Credentials, Registration, User};
use crate::storage::TokenStore;

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// A user is only ever held next to the token that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    /// A persisted token waiting on the identity check.
    Restoring(BearerToken),
    Active {
        token: BearerToken,
        user: User,
    },
}

impl SessionState {
    pub fn token(&self) -> Option<&BearerToken> {
        match self {
            SessionState::LoggedOut => None,
            SessionState::Restoring(token) => Some(token),
            SessionState::Active { token, .. } => Some(token),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Active { user, .. } => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    pub fn failure_notice(self) -> &'static str {
        match self {
            AuthAction::Login => "Login failed",
            AuthAction::Register => "Registration failed",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthAction::Login => f.write_str("login"),
            AuthAction::Register => f.write_str("registration"),
        }
    }
}

pub struct SessionManager {
    store: Box<dyn TokenStore>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            state: SessionState::LoggedOut,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Token for authenticated requests. `None` until the identity is known.
    pub fn bearer(&self) -> Option<&BearerToken> {
        match &self.state {
            SessionState::Active { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_restoring(&self) -> bool {
        matches!(self.state, SessionState::Restoring(_))
    }

    pub fn login<A: PortalApi + ?Sized>(&mut self, api: &A, email: &str, password: &str) -> bool {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = api.login(&credentials);
        self.accept_auth(AuthAction::Login, result)
    }

    pub fn register<A: PortalApi + ?Sized>(&mut self, api: &A, registration: &Registration) -> bool {
        let result = api.register(registration);
        self.accept_auth(AuthAction::Register, result)
    }

    /// Applies the outcome of a login or registration request.
    ///
    /// Failures leave the current session exactly as it was.
    pub fn accept_auth(&mut self, action: AuthAction, result: Result<AuthResponse>) -> bool {
        match result {
            Ok(auth) => {
                let token = BearerToken::new(auth.access_token);
                if let Err(err) = self.store.save(token.secret()) {
                    warn!("failed to persist session token: {err:#}");
                }
                info!("{action} succeeded for {}", auth.user.username);
                self.state = SessionState::Active {
                    token,
                    user: auth.user,
                };
                true
            }
            Err(err) => {
                error!("{action} failed: {err:#}");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!("failed to remove persisted token: {err:#}");
        }
        if self.state != SessionState::LoggedOut {
            info!("session ended");
        }
        self.state = SessionState::LoggedOut;
    }

    /// Loads the persisted token, if any, and moves into `Restoring`.
    /// The caller is expected to run the identity check with the returned
    /// token and report back through [`SessionManager::finish_restore`].
    pub fn begin_restore(&mut self) -> Option<BearerToken> {
        if self.state != SessionState::LoggedOut {
            return None;
        }
        match self.store.load() {
            Ok(Some(raw)) => {
                let token = BearerToken::new(raw);
                self.state = SessionState::Restoring(token.clone());
                Some(token)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("failed to read persisted token: {err:#}");
                None
            }
        }
    }

    pub fn finish_restore(&mut self, token: BearerToken, result: Result<User>) -> bool {
        if self.state != SessionState::Restoring(token.clone()) {
            debug!("discarding identity check for a session that is no longer restoring");
            return false;
        }
        match result {
            Ok(user) => {
                info!("restored session for {}", user.username);
                self.state = SessionState::Active { token, user };
                true
            }
            Err(err) => {
                warn!("persisted token rejected: {err:#}");
                self.logout();
                false
            }
        }
    }

    pub fn restore_session<A: PortalApi + ?Sized>(&mut self, api: &A) -> bool {
        let Some(token) = self.begin_restore() else {
            return false;
        };
        let result = api.current_user(&token);
        self.finish_restore(token, result)
    }
}
