//! Shared screen state.
//!
//! Screens accept this bundle so they depend only on the stores and the
//! ports behind them, and stay testable without files or timers.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{ConsultationRemote, CookieStore, CredentialVerifier, KeyValueStore};
use crate::domain::{ConsultationStore, SessionStore};

/// Parameter object bundling the port implementations the stores need.
#[derive(Clone)]
pub struct AppStatePorts {
    pub verifier: Arc<dyn CredentialVerifier>,
    pub profiles: Arc<dyn KeyValueStore>,
    pub cookies: Arc<dyn CookieStore>,
    pub remote: Arc<dyn ConsultationRemote>,
}

/// Dependency bundle for screens.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub consultations: Arc<ConsultationStore<dyn ConsultationRemote>>,
}

impl AppState {
    /// Build both stores over `ports`, sharing `clock`.
    ///
    /// The session still needs [`SessionStore::restore`] before the guard
    /// lets protected routes render.
    pub fn new(ports: AppStatePorts, clock: Arc<dyn Clock>) -> Self {
        let AppStatePorts {
            verifier,
            profiles,
            cookies,
            remote,
        } = ports;
        Self {
            session: Arc::new(SessionStore::new(
                verifier,
                profiles,
                cookies,
                Arc::clone(&clock),
            )),
            consultations: Arc::new(ConsultationStore::new(remote, clock)),
        }
    }
}
