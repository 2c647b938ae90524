//! Domain primitives, aggregates and the two application stores.
//!
//! Purpose: Define strongly typed entities for the scheduling client and the
//! stores that own them. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): failure payload shown to the user.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): authenticated identity.
//! - Consultation (alias to `consultation::Consultation`): a booked visit.
//! - SessionStore: current identity and its durable mirror.
//! - ConsultationStore: consultation collection and dashboard metrics.

pub mod auth;
pub mod consultation;
pub mod consultation_store;
pub mod error;
pub mod ports;
pub mod session_store;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::consultation::{
    Consultation, ConsultationDraft, ConsultationForm, ConsultationId, ConsultationStatus,
    ConsultationValidationError, DashboardMetrics, FieldErrors, FormField,
    ParseConsultationStatusError,
};
pub use self::consultation_store::{ConsultationStore, ConsultationsSnapshot};
pub use self::error::{Error, ErrorCode};
pub use self::session_store::{RestoreOutcome, SessionStore};
pub use self::user::{DisplayName, ParseRoleError, Role, User, UserId, UserValidationError};

/// Convenient result alias for store and screen operations.
///
/// # Examples
/// ```
/// use conectahc::domain::{AppResult, Error};
///
/// fn load() -> AppResult<()> {
///     Err(Error::not_found("Consulta não encontrada"))
/// }
///
/// assert!(load().is_err());
/// ```
pub type AppResult<T> = Result<T, Error>;
