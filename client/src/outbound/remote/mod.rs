//! Simulated consultation backend.
//!
//! There is no real server: the remote answers fetches with a bundled seed
//! dataset and acknowledges every mutation, each after a fixed latency.

mod simulated;

use std::time::Duration;

use async_trait::async_trait;

pub use simulated::{SimulatedConsultationRemote, seed_consultations};

/// Async sleeping abstraction so latency can be skipped or gated in tests.
#[async_trait]
pub trait LatencySleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl LatencySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
