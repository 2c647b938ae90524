//! Login form input.
//!
//! The login screen builds [`LoginCredentials`] before calling the session
//! store, so blank fields are reported inline and never reach the verifier.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

/// A login field left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    #[error("Email é obrigatório")]
    EmptyEmail,
    #[error("Senha é obrigatória")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the input the message belongs next to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

/// Email and password as submitted, checked for presence only.
///
/// Both values are kept exactly as typed, so `" pedro@gmail.com"` is a
/// different email from `"pedro@gmail.com"`. The password is wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use conectahc::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" pedro@gmail.com ", "pedro123")
///     .expect("both fields present");
/// assert_eq!(creds.email(), " pedro@gmail.com ");
/// assert!(!format!("{creds:?}").contains("pedro123"));
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw form values; the email is checked first.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
