//! Latency-only remote that always serves the seed dataset.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{LatencySleeper, TokioSleeper};
use crate::domain::Consultation;
use crate::domain::ports::{ConsultationMutation, ConsultationRemote, ConsultationRemoteError};

const SEED_JSON: &str = include_str!("seed.json");

/// Parse the bundled seed dataset.
///
/// # Examples
/// ```
/// use conectahc::outbound::remote::seed_consultations;
///
/// let seed = seed_consultations().expect("bundled seed parses");
/// assert_eq!(seed.len(), 2);
/// ```
pub fn seed_consultations() -> Result<Vec<Consultation>, ConsultationRemoteError> {
    serde_json::from_str(SEED_JSON).map_err(|err| {
        ConsultationRemoteError::unavailable(format!("invalid seed dataset: {err}"))
    })
}

/// Remote that waits `latency` before answering every call.
#[derive(Clone)]
pub struct SimulatedConsultationRemote {
    latency: Duration,
    sleeper: Arc<dyn LatencySleeper>,
}

impl SimulatedConsultationRemote {
    /// Remote sleeping on the tokio timer.
    pub fn new(latency: Duration) -> Self {
        Self::with_sleeper(latency, Arc::new(TokioSleeper))
    }

    /// Remote sleeping through `sleeper`.
    pub fn with_sleeper(latency: Duration, sleeper: Arc<dyn LatencySleeper>) -> Self {
        Self { latency, sleeper }
    }

    /// Configured latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl ConsultationRemote for SimulatedConsultationRemote {
    async fn fetch_all(&self) -> Result<Vec<Consultation>, ConsultationRemoteError> {
        self.sleeper.sleep(self.latency).await;
        let consultations = seed_consultations()?;
        debug!(count = consultations.len(), "serving seed consultations");
        Ok(consultations)
    }

    async fn submit(&self, mutation: &ConsultationMutation) -> Result<(), ConsultationRemoteError> {
        self.sleeper.sleep(self.latency).await;
        debug!(operation = mutation.operation(), "mutation acknowledged");
        Ok(())
    }
}
