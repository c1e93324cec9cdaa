//! Session store: the authenticated identity of this client
//!
//! States are `Unauthenticated` and `Authenticated(identity)`. A successful
//! login or rehydrate moves to `Authenticated`; logout moves back. A failed
//! login leaves the state exactly as it was.

use eventease_api::{Identity, Notice};
use eventease_store::{KeyValueStore, StoreError, USER_KEY, read_json, write_json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{CredentialDirectory, Notifier};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Current session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Unauthenticated => None,
            SessionState::Authenticated(identity) => Some(identity),
        }
    }
}

/// Owner of the current identity
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    directory: CredentialDirectory,
    notifier: Arc<dyn Notifier>,
    state: SessionState,
    loading: bool,
}

impl SessionStore {
    /// Create an unauthenticated store. It reports loading until
    /// [`SessionStore::rehydrate`] runs.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        directory: CredentialDirectory,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            directory,
            notifier,
            state: SessionState::Unauthenticated,
            loading: true,
        }
    }

    /// Create a store and restore any persisted identity
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        directory: CredentialDirectory,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut session = Self::new(store, directory, notifier);
        session.rehydrate();
        session
    }

    /// Restore the persisted identity, if any.
    ///
    /// Never fails: an unreadable or corrupt record degrades to
    /// `Unauthenticated`, and a corrupt record is removed.
    pub fn rehydrate(&mut self) -> &SessionState {
        match read_json::<Identity>(self.store.as_ref(), USER_KEY) {
            Ok(Some(identity)) => {
                debug!(user_id = %identity.id, "Session restored");
                self.state = SessionState::Authenticated(identity);
            }
            Ok(None) => {
                debug!("No persisted session");
            }
            Err(StoreError::Serialization(e)) => {
                warn!(error = %e, "Discarding corrupt persisted session");
                if let Err(e) = self.store.remove(USER_KEY) {
                    warn!(error = %e, "Failed to remove corrupt session record");
                }
                self.state = SessionState::Unauthenticated;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                self.state = SessionState::Unauthenticated;
            }
        }

        self.loading = false;
        &self.state
    }

    /// Authenticate against the credential directory.
    ///
    /// On failure the session is left untouched.
    pub fn login(&mut self, email: &str, password: &str) -> SessionResult<Identity> {
        let Some(identity) = self.directory.authenticate(email, password) else {
            info!(email, "Login rejected");
            self.notifier
                .notify(Notice::destructive("Login Failed", "Invalid email or password"));
            return Err(SessionError::InvalidCredentials);
        };

        if let Err(e) = write_json(self.store.as_ref(), USER_KEY, &identity) {
            warn!(error = %e, "Failed to persist session");
            self.notifier.notify(Notice::destructive(
                "Login Failed",
                "Your session could not be saved.",
            ));
            return Err(e.into());
        }

        info!(user_id = %identity.id, role = %identity.role, "Login successful");
        self.notifier.notify(Notice::info(
            "Login Successful",
            format!("Welcome back, {}!", identity.name),
        ));
        self.state = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// End the session. Always succeeds.
    pub fn logout(&mut self) {
        self.clear();
        info!("Logged out");
        self.notifier.notify(Notice::info(
            "Logged Out",
            "You have been successfully logged out.",
        ));
    }

    /// Drop the session and its persisted record without a notice
    pub fn clear(&mut self) {
        self.state = SessionState::Unauthenticated;
        if let Err(e) = self.store.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove persisted session");
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&Identity> {
        self.state.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current().is_some_and(Identity::is_admin)
    }

    /// True from construction until the first rehydrate completes
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn directory(&self) -> &CredentialDirectory {
        &self.directory
    }

    /// The current identity, or `NotAuthenticated`
    pub fn require_user(&self) -> SessionResult<&Identity> {
        self.current().ok_or(SessionError::NotAuthenticated)
    }

    /// The current identity if it holds the admin role
    pub fn require_admin(&self) -> SessionResult<&Identity> {
        let identity = self.require_user()?;
        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(SessionError::AdminRequired)
        }
    }
}
