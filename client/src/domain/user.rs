//! The authenticated user and the profile record mirrored into storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a profile field is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must not contain surrounding whitespace")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Opaque identifier issued by the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            Err(UserValidationError::EmptyId)
        } else if id.trim() != id {
            Err(UserValidationError::InvalidId)
        } else {
            Ok(Self(id))
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name shown in the greeting and the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access level. Every account currently behaves the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Admin,
}

/// Unrecognised role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid user role")]
pub struct ParseRoleError;

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "patient" => Ok(Self::Patient),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError),
        }
    }
}

/// Authenticated application user.
///
/// The JSON shape `{"id","email","name","role"}` is what the session store
/// writes under its profile key, so it must stay stable across releases.
///
/// # Examples
/// ```
/// use conectahc::domain::{DisplayName, Role, User, UserId};
///
/// let user = User::new(
///     UserId::new("1").expect("id"),
///     "pedro@gmail.com",
///     DisplayName::new("Pedro Silva").expect("name"),
///     Role::Patient,
/// )
/// .expect("valid user");
/// let stored = serde_json::to_string(&user).expect("serialise");
/// assert_eq!(
///     stored,
///     r#"{"id":"1","email":"pedro@gmail.com","name":"Pedro Silva","role":"patient"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredProfile")]
pub struct User {
    id: UserId,
    email: String,
    name: DisplayName,
    role: Role,
}

impl User {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        name: DisplayName,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self {
            id,
            email,
            name,
            role,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Deserialisation shape; the newtypes validate themselves, the email is
/// checked by [`User::new`].
#[derive(Deserialize)]
struct StoredProfile {
    id: UserId,
    email: String,
    name: DisplayName,
    role: Role,
}

impl TryFrom<StoredProfile> for User {
    type Error = UserValidationError;

    fn try_from(value: StoredProfile) -> Result<Self, Self::Error> {
        Self::new(value.id, value.email, value.name, value.role)
    }
}
