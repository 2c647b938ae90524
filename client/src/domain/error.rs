//! Domain-level error types.
//!
//! Screens never inspect adapter failures directly. Stores translate them
//! into an [`Error`] whose code decides where the message lands: next to a
//! field, in the banner, or nowhere because the screen redirects.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure category shared by every store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The supplied email/password pair was rejected.
    InvalidCredentials,
    /// One or more form fields failed validation.
    ValidationFailed,
    /// The requested consultation does not exist.
    NotFound,
    /// A fetch or mutation against the remote side failed.
    OperationFailed,
    /// Something the user cannot act on, such as unwritable storage.
    InternalError,
}

impl ErrorCode {
    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::ValidationFailed => "validation_failed",
            Self::NotFound => "not_found",
            Self::OperationFailed => "operation_failed",
            Self::InternalError => "internal_error",
        }
    }

    /// Message shown when a caller supplies none.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Credenciais inválidas",
            Self::ValidationFailed => "Verifique os campos destacados",
            Self::NotFound => "Registro não encontrado",
            Self::OperationFailed => "Não foi possível concluir a operação",
            Self::InternalError => "Erro inesperado",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by the stores.
///
/// The message is always non-empty: a blank message is replaced by the
/// code's [`ErrorCode::fallback_message`].
///
/// # Examples
/// ```
/// use conectahc::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Consulta não encontrada");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(Error::new(ErrorCode::NotFound, " ").message(), "Registro não encontrado");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Error with `code` and `message`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Text for the user.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Structured context, such as per-field validation messages.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use conectahc::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation_failed("Verifique os campos")
    ///     .with_details(json!({ "patientName": "Nome deve ter no mínimo 3 caracteres" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCredentials, message)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OperationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn display_is_the_message() {
        let err = Error::invalid_credentials("Credenciais inválidas");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.to_string(), "Credenciais inválidas");
    }

    #[rstest]
    #[case(ErrorCode::OperationFailed, "")]
    #[case(ErrorCode::NotFound, "   ")]
    #[case(ErrorCode::InternalError, "\n")]
    fn blank_messages_fall_back_per_code(#[case] code: ErrorCode, #[case] message: &str) {
        let err = Error::new(code, message);
        assert_eq!(err.message(), code.fallback_message());
    }

    #[rstest]
    #[case(ErrorCode::InvalidCredentials)]
    #[case(ErrorCode::ValidationFailed)]
    #[case(ErrorCode::NotFound)]
    #[case(ErrorCode::OperationFailed)]
    #[case(ErrorCode::InternalError)]
    fn wire_name_matches_serde(#[case] code: ErrorCode) {
        let value = serde_json::to_value(code).expect("serialise code");
        assert_eq!(value, json!(code.as_str()));
    }

    #[rstest]
    fn serialises_details_only_when_present() {
        let bare = serde_json::to_value(Error::not_found("Consulta não encontrada"))
            .expect("serialise error");
        assert_eq!(
            bare,
            json!({ "code": "not_found", "message": "Consulta não encontrada" })
        );

        let detailed = Error::operation_failed("Erro ao criar consulta")
            .with_details(json!({ "operation": "create" }));
        let value = serde_json::to_value(&detailed).expect("serialise error");
        assert_eq!(value["details"]["operation"], "create");
    }
}
