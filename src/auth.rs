use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::watch;

use crate::api::error::ApiError;
use crate::api::user::UserProfile;
use crate::session::SessionStore;

/// A token together with the profile it belongs to. Can only be built from a
/// non-empty token and a valid profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    profile: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, profile: UserProfile) -> Option<Self> {
        let token = token.into();
        if token.is_empty() || !profile.is_valid() {
            return None;
        }
        Some(Self { token, profile })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Storage has not been read yet.
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Login,
}

/// Receives the navigation side effects of login and logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("session token cannot be empty")]
    EmptyToken,

    #[error("user profile requires an id and an email")]
    InvalidProfile,
}

/// Owner of the authentication state. Handed explicitly to whoever needs to know
/// who is logged in; the only writer of the persisted session.
pub struct AuthContext {
    store: SessionStore,
    state: watch::Sender<AuthState>,
    navigator: Arc<dyn Navigator>,
    initialized: AtomicBool,
}

impl AuthContext {
    pub fn new(store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            store,
            state,
            navigator,
            initialized: AtomicBool::new(false),
        }
    }

    /// Restores the session from storage. Runs once; later calls return the current
    /// state untouched. Anything short of a valid token and profile pair is cleared.
    pub fn initialize(&self) -> AuthState {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Auth context already initialized, skip");
            return self.state();
        }

        let token = self.store.load_token();
        let profile = self.store.load_user();
        let state = match (token, profile) {
            (Some(token), Some(profile)) => match Session::new(token, profile) {
                Some(session) => AuthState::Authenticated(session),
                None => AuthState::Unauthenticated,
            },
            (token, profile) => {
                if token.is_some() || profile.is_some() {
                    warn!("Found an incomplete session in storage, clearing it");
                }
                AuthState::Unauthenticated
            }
        };

        if !matches!(state, AuthState::Authenticated(_)) {
            self.store.clear();
        }
        match state {
            AuthState::Authenticated(ref session) => {
                debug!("Restored session of {}", session.profile().email)
            }
            _ => debug!("No session to restore"),
        }

        self.state.send_replace(state.clone());
        state
    }

    /// Writes the session through to storage and switches to authenticated. A failed
    /// write is only logged: the session then lives in memory until the process ends.
    pub fn login(&self, token: &str, profile: UserProfile) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        let session = match Session::new(token, profile) {
            Some(session) => session,
            None => return Err(AuthError::InvalidProfile),
        };

        if let Err(err) = self.store.save(session.token(), session.profile()) {
            warn!("Persist session failed, login will not survive a restart: {err}");
        }

        info!("Logged in as {}", session.profile().email);
        self.initialized.store(true, Ordering::SeqCst);
        self.state.send_replace(AuthState::Authenticated(session));
        self.navigator.navigate(View::Landing);
        Ok(())
    }

    pub fn logout(&self) {
        self.store.clear();
        self.initialized.store(true, Ordering::SeqCst);
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        if let AuthState::Authenticated(session) = previous {
            info!("Logged out {}", session.profile().email);
        }
        self.navigator.navigate(View::Login);
    }

    /// Logs out when the backend refused the session token (401 or 403), so the
    /// stale session is not sent again. Returns whether a logout happened.
    pub fn forget_rejected(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() || !self.is_authenticated() {
            return false;
        }
        warn!("Server rejected the session: {err}");
        self.logout();
        true
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Waits until the state is no longer [`AuthState::Unknown`].
    pub async fn settled(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(AuthState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => return self.state(),
        };
        state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::Authenticated(_))
    }

    pub fn token(&self) -> Option<String> {
        match *self.state.borrow() {
            AuthState::Authenticated(ref session) => Some(session.token().to_string()),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<UserProfile> {
        match *self.state.borrow() {
            AuthState::Authenticated(ref session) => Some(session.profile().clone()),
            _ => None,
        }
    }
}
