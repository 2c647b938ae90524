//! Port for checking login credentials.
//!
//! The session store only needs "credentials in, identity out". The fixture
//! implementation keeps the single demo account until an identity provider
//! is wired in.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, LoginCredentials, Role, User, UserId};

/// Email accepted by [`FixtureCredentialVerifier`].
pub const FIXTURE_EMAIL: &str = "pedro@gmail.com";
/// Password accepted by [`FixtureCredentialVerifier`].
pub const FIXTURE_PASSWORD: &str = "pedro123";
/// Identifier issued to the fixture account.
pub const FIXTURE_USER_ID: &str = "1";
/// Display name of the fixture account.
pub const FIXTURE_DISPLAY_NAME: &str = "Pedro Silva";

/// Capability that turns credentials into an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the identity for `credentials` or an
    /// [`ErrorCode::InvalidCredentials`](crate::domain::ErrorCode::InvalidCredentials) error.
    async fn verify(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Verifier accepting exactly one email/password pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialVerifier;

#[async_trait]
impl CredentialVerifier for FixtureCredentialVerifier {
    async fn verify(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.email() != FIXTURE_EMAIL || credentials.password() != FIXTURE_PASSWORD {
            return Err(Error::invalid_credentials("Credenciais inválidas"));
        }

        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let name = DisplayName::new(FIXTURE_DISPLAY_NAME)
            .map_err(|err| Error::internal(format!("invalid fixture display name: {err}")))?;
        User::new(id, credentials.email(), name, Role::Patient)
            .map_err(|err| Error::internal(format!("invalid fixture user: {err}")))
    }
}
