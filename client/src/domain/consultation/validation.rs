//! Consultation form schema.
//!
//! Raw form inputs arrive as strings, exactly as a form field yields them.
//! [`ConsultationForm::validate`] either coerces them into a
//! [`ConsultationDraft`] or reports every violated field at once so the
//! screen can show each message next to its input.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::{Consultation, ConsultationDraft, ConsultationStatus};
use crate::domain::Error;

/// Minimum number of characters in a patient name.
pub const PATIENT_NAME_MIN: usize = 3;
/// Minimum number of characters in a consultation type.
pub const TYPE_MIN: usize = 3;
/// Minimum number of characters in a description.
pub const DESCRIPTION_MIN: usize = 5;
/// Shortest bookable consultation, in minutes.
pub const DURATION_MIN: u32 = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form inputs, keyed the way the form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    PatientId,
    PatientName,
    Type,
    Description,
    Duration,
    Date,
    Status,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::PatientId,
        Self::PatientName,
        Self::Type,
        Self::Description,
        Self::Duration,
        Self::Date,
        Self::Status,
    ];

    /// Input name used by the form and in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatientId => "patientId",
            Self::PatientName => "patientName",
            Self::Type => "type",
            Self::Description => "description",
            Self::Duration => "duration",
            Self::Date => "date",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field violation messages; never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    fn insert(&mut self, field: FormField, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_owned());
    }

    /// Message for `field`, if it failed validation.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterate violations in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Number of violated fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object mapping input names to messages.
    pub fn to_details(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(field, message)| (field.as_str().to_owned(), Value::from(message)))
            .collect();
        Value::Object(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::validation_failed("Verifique os campos destacados").with_details(value.to_details())
    }
}

/// Raw consultation form state.
///
/// # Examples
/// ```
/// use conectahc::domain::{ConsultationForm, FormField};
///
/// let form = ConsultationForm {
///     patient_id: "1".to_owned(),
///     patient_name: "Al".to_owned(),
///     kind: "Consulta".to_owned(),
///     description: "Rotina".to_owned(),
///     duration: "3".to_owned(),
///     date: "2025-11-05".to_owned(),
///     status: "scheduled".to_owned(),
/// };
/// let errors = form.validate().expect_err("two fields are invalid");
/// assert_eq!(errors.len(), 2);
/// assert!(errors.get(FormField::Duration).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationForm {
    pub patient_id: String,
    pub patient_name: String,
    pub kind: String,
    pub description: String,
    pub duration: String,
    pub date: String,
    pub status: String,
}

impl Default for ConsultationForm {
    fn default() -> Self {
        Self {
            patient_id: String::new(),
            patient_name: String::new(),
            kind: String::new(),
            description: String::new(),
            duration: String::new(),
            date: String::new(),
            status: ConsultationStatus::Scheduled.to_string(),
        }
    }
}

impl ConsultationForm {
    /// Form prefilled from an existing draft.
    pub fn from_draft(draft: &ConsultationDraft) -> Self {
        Self {
            patient_id: draft.patient_id.clone(),
            patient_name: draft.patient_name.clone(),
            kind: draft.kind.clone(),
            description: draft.description.clone(),
            duration: draft.duration_minutes.to_string(),
            date: draft.date.format(DATE_FORMAT).to_string(),
            status: draft.status.to_string(),
        }
    }

    /// Form prefilled from a stored consultation, for the edit screen.
    pub fn from_consultation(consultation: &Consultation) -> Self {
        Self::from_draft(consultation.draft())
    }

    /// Check every field and coerce the inputs into a draft.
    pub fn validate(&self) -> Result<ConsultationDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.patient_id.is_empty() {
            errors.insert(FormField::PatientId, "ID do paciente é obrigatório");
        }
        if self.patient_name.chars().count() < PATIENT_NAME_MIN {
            errors.insert(FormField::PatientName, "Nome deve ter no mínimo 3 caracteres");
        }
        if self.kind.chars().count() < TYPE_MIN {
            errors.insert(FormField::Type, "Tipo é obrigatório");
        }
        if self.description.chars().count() < DESCRIPTION_MIN {
            errors.insert(
                FormField::Description,
                "Descrição deve ter no mínimo 5 caracteres",
            );
        }

        let duration = match self.duration.trim().parse::<i64>() {
            Ok(minutes) if minutes < i64::from(DURATION_MIN) => {
                errors.insert(FormField::Duration, "Duração mínima é 5 minutos");
                None
            }
            Ok(minutes) => u32::try_from(minutes).ok().or_else(|| {
                errors.insert(FormField::Duration, "Duração deve ser um número");
                None
            }),
            Err(_) => {
                errors.insert(FormField::Duration, "Duração deve ser um número");
                None
            }
        };

        let date = if self.date.is_empty() {
            errors.insert(FormField::Date, "Data é obrigatória");
            None
        } else {
            let parsed = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok();
            if parsed.is_none() {
                errors.insert(FormField::Date, "Data inválida");
            }
            parsed
        };

        let status = self.status.parse::<ConsultationStatus>().ok();
        if status.is_none() {
            errors.insert(FormField::Status, "Status inválido");
        }

        match (duration, date, status) {
            (Some(duration_minutes), Some(date), Some(status)) if errors.is_empty() => {
                Ok(ConsultationDraft {
                    patient_id: self.patient_id.clone(),
                    patient_name: self.patient_name.clone(),
                    kind: self.kind.clone(),
                    description: self.description.clone(),
                    duration_minutes,
                    date,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}
