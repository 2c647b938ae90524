//! Consultation scheduling records and their derived views.
//!
//! A consultation is created from a [`ConsultationDraft`] (the editable
//! fields) once the store assigns an identifier and timestamps. Dashboard
//! metrics and form validation live in submodules so screens can depend on
//! them without pulling in the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod metrics;
pub mod validation;

pub use metrics::DashboardMetrics;
pub use validation::{ConsultationForm, FieldErrors, FormField};

/// Validation errors raised by consultation constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsultationValidationError {
    #[error("consultation id must not be empty")]
    EmptyId,
    #[error("consultation id must not contain surrounding whitespace")]
    InvalidId,
    #[error("consultation updatedAt ({updated_at}) must be >= createdAt ({created_at})")]
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

/// Opaque consultation identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConsultationId(String);

impl ConsultationId {
    /// Validate and construct a [`ConsultationId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use conectahc::domain::ConsultationId;
    ///
    /// let id = ConsultationId::new("1730282400000").expect("valid id");
    /// assert_eq!(id.as_ref(), "1730282400000");
    /// assert!(ConsultationId::new("").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, ConsultationValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, ConsultationValidationError> {
        if id.is_empty() {
            return Err(ConsultationValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ConsultationValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ConsultationId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ConsultationId> for String {
    fn from(value: ConsultationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ConsultationId {
    type Error = ConsultationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Lifecycle state of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Error returned when parsing a consultation status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid consultation status")]
pub struct ParseConsultationStatusError;

impl ConsultationStatus {
    /// Badge label shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Agendada",
            Self::Completed => "Concluída",
            Self::Cancelled => "Cancelada",
        }
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => f.write_str("scheduled"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl FromStr for ConsultationStatus {
    type Err = ParseConsultationStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseConsultationStatusError),
        }
    }
}

/// Editable consultation fields, as produced by the form validator.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use conectahc::domain::{ConsultationDraft, ConsultationStatus};
///
/// let draft = ConsultationDraft {
///     patient_id: "1".to_owned(),
///     patient_name: "Ana Silva".to_owned(),
///     kind: "Consulta".to_owned(),
///     description: "Rotina".to_owned(),
///     duration_minutes: 30,
///     date: NaiveDate::from_ymd_opt(2025, 11, 5).expect("valid date"),
///     status: ConsultationStatus::Scheduled,
/// };
/// assert_eq!(draft.duration_minutes, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDraft {
    pub patient_id: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub date: NaiveDate,
    pub status: ConsultationStatus,
}

/// A scheduled, completed or cancelled consultation.
///
/// ## Invariants
/// - `updated_at >= created_at`.
/// - `id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConsultationDto", into = "ConsultationDto")]
pub struct Consultation {
    id: ConsultationId,
    draft: ConsultationDraft,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Consultation {
    /// Create a freshly stored consultation; both timestamps equal `now`.
    pub fn new(id: ConsultationId, draft: ConsultationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a consultation from stored parts, enforcing timestamp order.
    pub fn restore(
        id: ConsultationId,
        draft: ConsultationDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ConsultationValidationError> {
        if updated_at < created_at {
            return Err(ConsultationValidationError::UpdatedBeforeCreated {
                created_at,
                updated_at,
            });
        }
        Ok(Self {
            id,
            draft,
            created_at,
            updated_at,
        })
    }

    /// Replace every editable field, keeping `id` and `created_at`.
    ///
    /// `updated_at` moves strictly forward even when the clock has not
    /// advanced since the previous write.
    #[must_use]
    pub fn revise(&self, draft: ConsultationDraft, now: DateTime<Utc>) -> Self {
        let floor = self.updated_at + TimeDelta::milliseconds(1);
        Self {
            id: self.id.clone(),
            draft,
            created_at: self.created_at,
            updated_at: now.max(floor),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &ConsultationId {
        &self.id
    }

    /// Editable fields.
    pub fn draft(&self) -> &ConsultationDraft {
        &self.draft
    }

    /// Identifier of the patient.
    pub fn patient_id(&self) -> &str {
        self.draft.patient_id.as_str()
    }

    /// Patient display name.
    pub fn patient_name(&self) -> &str {
        self.draft.patient_name.as_str()
    }

    /// Free-text consultation category.
    pub fn kind(&self) -> &str {
        self.draft.kind.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.draft.description.as_str()
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.draft.duration_minutes
    }

    /// Calendar date of the appointment.
    pub fn date(&self) -> NaiveDate {
        self.draft.date
    }

    /// Lifecycle state.
    pub fn status(&self) -> ConsultationStatus {
        self.draft.status
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsultationDto {
    id: String,
    #[serde(flatten)]
    draft: ConsultationDraft,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Consultation> for ConsultationDto {
    fn from(value: Consultation) -> Self {
        let Consultation {
            id,
            draft,
            created_at,
            updated_at,
        } = value;
        Self {
            id: id.into(),
            draft,
            created_at,
            updated_at,
        }
    }
}

impl TryFrom<ConsultationDto> for Consultation {
    type Error = ConsultationValidationError;

    fn try_from(value: ConsultationDto) -> Result<Self, Self::Error> {
        let ConsultationDto {
            id,
            draft,
            created_at,
            updated_at,
        } = value;
        Self::restore(ConsultationId::new(id)?, draft, created_at, updated_at)
    }
}
