//! Port for the remote side of the consultation store.
//!
//! The remote answers fetches with the canonical dataset and acknowledges
//! mutation requests. The store commits acknowledged mutations to its own
//! collection, so adapters never see or patch client state.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Consultation, ConsultationDraft, ConsultationId};

/// Mutation request sent to the remote before the store commits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsultationMutation {
    /// Book a new consultation.
    Create(ConsultationDraft),
    /// Replace every editable field of an existing consultation.
    Update {
        id: ConsultationId,
        draft: ConsultationDraft,
    },
    /// Remove a consultation.
    Delete(ConsultationId),
}

impl ConsultationMutation {
    /// Short operation name used in logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Errors raised by consultation remote adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsultationRemoteError {
    /// The remote could not be reached.
    #[error("consultation remote unavailable: {message}")]
    Unavailable { message: String },
    /// The remote refused the request.
    #[error("consultation remote rejected the request: {message}")]
    Rejected { message: String },
}

impl ConsultationRemoteError {
    /// Helper for connectivity failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for refused requests.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Request/response channel standing in for a consultation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsultationRemote: Send + Sync {
    /// Load the full consultation dataset.
    async fn fetch_all(&self) -> Result<Vec<Consultation>, ConsultationRemoteError>;

    /// Submit a mutation and wait for its acknowledgement.
    async fn submit(&self, mutation: &ConsultationMutation) -> Result<(), ConsultationRemoteError>;
}
