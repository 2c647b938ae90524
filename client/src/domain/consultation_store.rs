//! Consultation store: the in-memory collection behind the dashboard.
//!
//! Every mutation is sent to the [`ConsultationRemote`] first. Once the
//! remote acknowledges it, the store applies the change to the collection as
//! it stands at that moment and recomputes [`DashboardMetrics`] under the
//! same lock, so readers never observe metrics that disagree with the list.
//! Overlapping mutations therefore commit in completion order.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{ConsultationMutation, ConsultationRemote, ConsultationRemoteError};
use crate::domain::{Consultation, ConsultationDraft, ConsultationId, DashboardMetrics, Error};

/// Message recorded when loading the collection fails.
pub const LOAD_FAILED: &str = "Erro ao carregar consultas";
/// Message recorded when a create is rejected.
pub const CREATE_FAILED: &str = "Erro ao criar consulta";
/// Message recorded when an update is rejected.
pub const UPDATE_FAILED: &str = "Erro ao atualizar consulta";
/// Message recorded when a delete is rejected.
pub const DELETE_FAILED: &str = "Erro ao excluir consulta";
/// Message returned when an update targets an unknown id.
pub const NOT_FOUND: &str = "Consulta não encontrada";

/// Consistent view of the store taken under a single read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationsSnapshot {
    pub consultations: Vec<Consultation>,
    pub metrics: DashboardMetrics,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    consultations: Vec<Consultation>,
    metrics: DashboardMetrics,
    loading: bool,
    error: Option<String>,
}

impl StoreState {
    /// Apply `change` to the collection and refresh the derived metrics.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Vec<Consultation>) -> T) -> T {
        let outcome = change(&mut self.consultations);
        self.metrics = DashboardMetrics::from_consultations(&self.consultations);
        self.loading = false;
        outcome
    }

    fn position(&self, id: &ConsultationId) -> Option<usize> {
        self.consultations.iter().position(|c| c.id() == id)
    }
}

/// Owns the consultation collection and its derived dashboard metrics.
pub struct ConsultationStore<R: ?Sized> {
    remote: Arc<R>,
    clock: Arc<dyn Clock>,
    state: RwLock<StoreState>,
}

impl<R> ConsultationStore<R>
where
    R: ConsultationRemote + ?Sized,
{
    /// Create an empty store backed by `remote`.
    pub fn new(remote: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            remote,
            clock,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Replace the collection with the remote dataset.
    ///
    /// Failures are recorded in [`ConsultationStore::last_error`] and leave
    /// the previous collection in place.
    pub async fn fetch(&self) {
        self.begin();
        let result = self.remote.fetch_all().await;

        let mut state = self.write_state();
        match result {
            Ok(consultations) => {
                let count = consultations.len();
                state.commit(|current| *current = consultations);
                info!(count, "consultations loaded");
            }
            Err(error) => {
                warn!(%error, "failed to load consultations");
                state.error = Some(LOAD_FAILED.to_owned());
                state.loading = false;
            }
        }
    }

    /// Book a consultation and return the stored record.
    pub async fn create(&self, draft: ConsultationDraft) -> Result<Consultation, Error> {
        self.submit(&ConsultationMutation::Create(draft.clone()), CREATE_FAILED)
            .await?;

        let now = self.clock.utc();
        let mut state = self.write_state();
        let created = state.commit(|current| {
            let id = next_id(current, now)?;
            let created = Consultation::new(id, draft, now);
            current.push(created.clone());
            Ok::<_, Error>(created)
        })?;
        info!(id = %created.id(), "consultation created");
        Ok(created)
    }

    /// Replace every editable field of consultation `id`.
    pub async fn update(
        &self,
        id: &ConsultationId,
        draft: ConsultationDraft,
    ) -> Result<Consultation, Error> {
        if self.get_by_id(id).is_none() {
            return Err(self.record_missing(id));
        }

        let mutation = ConsultationMutation::Update {
            id: id.clone(),
            draft: draft.clone(),
        };
        self.submit(&mutation, UPDATE_FAILED).await?;

        let now = self.clock.utc();
        let mut state = self.write_state();
        // The record may have been deleted while the request was in flight.
        let Some(index) = state.position(id) else {
            drop(state);
            return Err(self.record_missing(id));
        };
        let revised = state.commit(|current| {
            let revised = current[index].revise(draft, now);
            current[index] = revised.clone();
            revised
        });
        info!(%id, "consultation updated");
        Ok(revised)
    }

    /// Remove consultation `id`; deleting an unknown id succeeds.
    pub async fn delete(&self, id: &ConsultationId) -> Result<(), Error> {
        self.submit(&ConsultationMutation::Delete(id.clone()), DELETE_FAILED)
            .await?;

        let removed = self.write_state().commit(|current| {
            let before = current.len();
            current.retain(|c| c.id() != id);
            before != current.len()
        });
        if removed {
            info!(%id, "consultation deleted");
        } else {
            debug!(%id, "delete acknowledged for absent consultation");
        }
        Ok(())
    }

    /// Look up a consultation by id.
    pub fn get_by_id(&self, id: &ConsultationId) -> Option<Consultation> {
        self.read_state()
            .consultations
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    /// Consultations in insertion order.
    pub fn consultations(&self) -> Vec<Consultation> {
        self.read_state().consultations.clone()
    }

    /// Metrics for the current collection.
    pub fn metrics(&self) -> DashboardMetrics {
        self.read_state().metrics
    }

    /// Whether a fetch or mutation is in flight.
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    /// Message describing the most recent failure, cleared when the next
    /// operation starts.
    pub fn last_error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    /// Every observable field at once.
    pub fn snapshot(&self) -> ConsultationsSnapshot {
        let state = self.read_state();
        ConsultationsSnapshot {
            consultations: state.consultations.clone(),
            metrics: state.metrics,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    fn begin(&self) {
        let mut state = self.write_state();
        state.loading = true;
        state.error = None;
    }

    async fn submit(
        &self,
        mutation: &ConsultationMutation,
        failure_message: &'static str,
    ) -> Result<(), Error> {
        self.begin();
        self.remote
            .submit(mutation)
            .await
            .map_err(|error| self.record_failure(mutation.operation(), failure_message, &error))
    }

    fn record_failure(
        &self,
        operation: &'static str,
        message: &'static str,
        error: &ConsultationRemoteError,
    ) -> Error {
        warn!(operation, %error, "consultation mutation failed");
        let mut state = self.write_state();
        state.error = Some(message.to_owned());
        state.loading = false;
        Error::operation_failed(message).with_details(json!({
            "operation": operation,
            "cause": error.to_string(),
        }))
    }

    fn record_missing(&self, id: &ConsultationId) -> Error {
        warn!(%id, "update requested for unknown consultation");
        let mut state = self.write_state();
        state.error = Some(NOT_FOUND.to_owned());
        state.loading = false;
        Error::not_found(NOT_FOUND).with_details(json!({ "id": id.as_ref() }))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Millisecond timestamp of `now`, bumped until no existing record uses it.
fn next_id(existing: &[Consultation], now: DateTime<Utc>) -> Result<ConsultationId, Error> {
    let mut candidate = now.timestamp_millis();
    while existing
        .iter()
        .any(|c| c.id().as_ref() == candidate.to_string())
    {
        candidate += 1;
    }
    ConsultationId::new(candidate.to_string())
        .map_err(|err| Error::internal(format!("generated invalid consultation id: {err}")))
}

#[cfg(test)]
#[path = "consultation_store_tests.rs"]
mod tests;
