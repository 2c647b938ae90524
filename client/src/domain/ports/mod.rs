//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the stores expect to interact with driven adapters
//! (client storage, the consultation remote, the identity check). Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

mod client_storage;
mod consultation_remote;
mod credential_verifier;

#[cfg(test)]
pub use client_storage::{MockCookieStore, MockKeyValueStore};
pub use client_storage::{ClientStorageError, CookieStore, KeyValueStore};
#[cfg(test)]
pub use consultation_remote::MockConsultationRemote;
pub use consultation_remote::{ConsultationMutation, ConsultationRemote, ConsultationRemoteError};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use credential_verifier::{
    CredentialVerifier, FIXTURE_DISPLAY_NAME, FIXTURE_EMAIL, FIXTURE_PASSWORD, FIXTURE_USER_ID,
    FixtureCredentialVerifier,
};
