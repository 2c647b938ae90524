//! Session store: the single owner of the authenticated identity.
//!
//! The store keeps the current [`User`] in memory and mirrors it into durable
//! client storage: the serialized profile in the key-value store and an
//! authentication marker cookie with a seven day expiry. Both must be present
//! for a session to survive a restart.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::TimeDelta;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{ClientStorageError, CookieStore, CredentialVerifier, KeyValueStore};
use crate::domain::{Error, LoginCredentials, User};

/// Key-value store entry holding the serialized profile.
pub const PROFILE_KEY: &str = "conectahc_user";
/// Cookie holding the authentication marker.
pub const AUTH_COOKIE: &str = "conectahc_auth";
/// Value written to [`AUTH_COOKIE`].
pub const AUTH_MARKER: &str = "authenticated";
/// Lifetime of the authentication marker.
pub const AUTH_COOKIE_TTL_DAYS: i64 = 7;

/// Result of reading the stored session at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Profile and marker were present and the profile parsed.
    Restored(User),
    /// Profile or marker was missing.
    Anonymous,
    /// The stored profile could not be parsed; both stores were cleared.
    Discarded,
}

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    loading: bool,
    initialized: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            initialized: false,
        }
    }
}

/// Holds the authenticated identity and its durable mirror.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use conectahc::domain::SessionStore;
/// use conectahc::domain::ports::FixtureCredentialVerifier;
/// use conectahc::outbound::storage::InMemoryClientStorage;
/// use mockable::DefaultClock;
///
/// let storage = Arc::new(InMemoryClientStorage::new(Arc::new(DefaultClock)));
/// let session = SessionStore::new(
///     Arc::new(FixtureCredentialVerifier),
///     storage.clone(),
///     storage,
///     Arc::new(DefaultClock),
/// );
/// session.restore();
/// assert!(!session.is_authenticated());
/// ```
pub struct SessionStore {
    verifier: Arc<dyn CredentialVerifier>,
    profiles: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieStore>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create an uninitialised store; call [`SessionStore::restore`] once at
    /// start-up.
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        profiles: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            profiles,
            cookies,
            clock,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Rebuild the session from durable storage and mark the store
    /// initialised.
    pub fn restore(&self) -> RestoreOutcome {
        let outcome = self.read_stored_session();
        let mut state = self.write_state();
        state.user = match &outcome {
            RestoreOutcome::Restored(user) => Some(user.clone()),
            RestoreOutcome::Anonymous | RestoreOutcome::Discarded => None,
        };
        state.loading = false;
        state.initialized = true;
        outcome
    }

    /// Authenticate, persist the session and make `credentials`' owner the
    /// current user.
    ///
    /// A rejected login leaves the previous state untouched. A login whose
    /// session cannot be persisted clears storage and ends any existing
    /// session, so memory never claims a session storage has lost.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        self.write_state().loading = true;
        let result = self.authenticate(credentials).await;

        let mut state = self.write_state();
        state.loading = false;
        let user = result?;
        info!(user_id = %user.id(), "user logged in");
        state.user = Some(user.clone());
        Ok(user)
    }

    /// Drop the session from memory and durable storage.
    pub fn logout(&self) {
        self.clear_storage();
        let previous = self.write_state().user.take();
        if let Some(user) = previous {
            info!(user_id = %user.id(), "user logged out");
        }
    }

    /// The authenticated user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    /// Whether a user is present.
    pub fn is_authenticated(&self) -> bool {
        self.read_state().user.is_some()
    }

    /// Whether a restore or login is in progress.
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    /// Whether [`SessionStore::restore`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.read_state().initialized
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self.verifier.verify(credentials).await?;
        if let Err(error) = self.persist(&user) {
            self.clear_storage();
            if let Some(previous) = self.write_state().user.take() {
                warn!(user_id = %previous.id(), "session ended; login could not be persisted");
            }
            return Err(error);
        }
        Ok(user)
    }

    fn persist(&self, user: &User) -> Result<(), Error> {
        let serialized = serde_json::to_string(user)
            .map_err(|err| Error::internal(format!("failed to serialise profile: {err}")))?;
        self.profiles
            .set_item(PROFILE_KEY, &serialized)
            .map_err(map_storage_error)?;

        let expires_at = self.clock.utc() + TimeDelta::days(AUTH_COOKIE_TTL_DAYS);
        self.cookies
            .set(AUTH_COOKIE, AUTH_MARKER, expires_at)
            .map_err(map_storage_error)
    }

    fn read_stored_session(&self) -> RestoreOutcome {
        let profile = match self.profiles.get_item(PROFILE_KEY) {
            Ok(profile) => profile,
            Err(error) => {
                warn!(%error, "stored profile unreadable; starting anonymous");
                return RestoreOutcome::Anonymous;
            }
        };
        let marker = match self.cookies.get(AUTH_COOKIE) {
            Ok(marker) => marker,
            Err(error) => {
                warn!(%error, "auth cookie unreadable; starting anonymous");
                return RestoreOutcome::Anonymous;
            }
        };

        let (Some(raw), Some(_)) = (profile, marker) else {
            return RestoreOutcome::Anonymous;
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                info!(user_id = %user.id(), "session restored");
                RestoreOutcome::Restored(user)
            }
            Err(error) => {
                warn!(%error, "discarding corrupted stored profile");
                self.clear_storage();
                RestoreOutcome::Discarded
            }
        }
    }

    fn clear_storage(&self) {
        if let Err(error) = self.profiles.remove_item(PROFILE_KEY) {
            warn!(%error, key = PROFILE_KEY, "failed to clear stored profile");
        }
        if let Err(error) = self.cookies.remove(AUTH_COOKIE) {
            warn!(%error, cookie = AUTH_COOKIE, "failed to clear auth cookie");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn map_storage_error(error: ClientStorageError) -> Error {
    match error {
        ClientStorageError::Unavailable { message } => {
            Error::internal(format!("client storage unavailable: {message}"))
        }
        ClientStorageError::Write { message } => {
            Error::internal(format!("failed to persist session: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
