//! Shared test doubles for store and adapter tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use tokio::sync::Notify;

use crate::domain::ports::{ConsultationRemote, FixtureCredentialVerifier};
use crate::domain::{ConsultationDraft, ConsultationStatus};
use crate::inbound::state::{AppState, AppStatePorts};
use crate::outbound::remote::{LatencySleeper, SimulatedConsultationRemote};
use crate::outbound::storage::InMemoryClientStorage;

/// Clock frozen at a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock starting at 2025-10-30T12:00:00Z.
    pub fn fixed() -> Self {
        let start = match Utc.with_ymd_and_hms(2025, 10, 30, 12, 0, 0).single() {
            Some(start) => start,
            None => panic!("fixture timestamp"),
        };
        Self::new(start)
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(TimeDelta::days(days));
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl LatencySleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that parks every caller until [`GatedSleeper::open`] is called.
#[derive(Default)]
pub struct GatedSleeper {
    gate: Notify,
    entered: Notify,
}

impl GatedSleeper {
    /// Wait until some caller has reached the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Release one parked caller.
    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl LatencySleeper for GatedSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.entered.notify_one();
        self.gate.notified().await;
    }
}

/// A valid draft for the demo patient.
pub fn sample_draft(
    kind: &str,
    status: ConsultationStatus,
    duration_minutes: u32,
) -> ConsultationDraft {
    let date = match NaiveDate::from_ymd_opt(2025, 11, 12) {
        Some(date) => date,
        None => panic!("fixture date"),
    };
    ConsultationDraft {
        patient_id: "1".to_owned(),
        patient_name: "Pedro Silva".to_owned(),
        kind: kind.to_owned(),
        description: "Retorno de acompanhamento".to_owned(),
        duration_minutes,
        date,
        status,
    }
}

/// Screen state over in-memory storage, the fixture verifier and `remote`.
pub fn app_state_with_remote(
    remote: Arc<dyn ConsultationRemote>,
    clock: Arc<MutableClock>,
) -> AppState {
    let storage = Arc::new(InMemoryClientStorage::new(clock.clone()));
    AppState::new(
        AppStatePorts {
            verifier: Arc::new(FixtureCredentialVerifier),
            profiles: storage.clone(),
            cookies: storage,
            remote,
        },
        clock,
    )
}

/// Screen state over the simulated remote with latency skipped.
pub fn app_state(clock: Arc<MutableClock>) -> AppState {
    let remote = SimulatedConsultationRemote::with_sleeper(
        Duration::from_millis(500),
        Arc::new(ImmediateSleeper),
    );
    app_state_with_remote(Arc::new(remote), clock)
}
