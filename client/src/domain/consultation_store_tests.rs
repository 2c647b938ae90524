//! Tests for the consultation store, driven through a mocked remote.

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockConsultationRemote;
use crate::domain::{ConsultationStatus, ErrorCode};
use crate::test_support::{MutableClock, sample_draft};

fn stored(id: &str, status: ConsultationStatus, duration_minutes: u32) -> Consultation {
    let created = Utc
        .with_ymd_and_hms(2025, 10, 20, 14, 0, 0)
        .single()
        .expect("fixture timestamp");
    Consultation::new(
        ConsultationId::new(id).expect("valid id"),
        sample_draft("Consulta Cardiologia", status, duration_minutes),
        created,
    )
}

fn seeded() -> Vec<Consultation> {
    vec![
        stored("1", ConsultationStatus::Scheduled, 30),
        stored("2", ConsultationStatus::Completed, 45),
    ]
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::fixed())
}

fn accepting_remote() -> MockConsultationRemote {
    let mut remote = MockConsultationRemote::new();
    remote.expect_fetch_all().returning(|| Ok(seeded()));
    remote.expect_submit().returning(|_| Ok(()));
    remote
}

async fn loaded_store(
    remote: MockConsultationRemote,
    clock: Arc<MutableClock>,
) -> ConsultationStore<MockConsultationRemote> {
    let store = ConsultationStore::new(Arc::new(remote), clock);
    store.fetch().await;
    store
}

#[rstest]
#[tokio::test]
async fn fetch_replaces_collection_and_metrics(clock: Arc<MutableClock>) {
    let store = loaded_store(accepting_remote(), clock).await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.consultations.len(), 2);
    assert_eq!(snapshot.metrics.total_consultations, 2);
    assert_eq!(snapshot.metrics.completed_consultations, 1);
    assert_eq!(snapshot.metrics.total_duration, 75);
    assert!((snapshot.metrics.attendance_rate - 50.0).abs() < f64::EPSILON);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
}

#[rstest]
#[tokio::test]
async fn fetch_failure_keeps_previous_collection(clock: Arc<MutableClock>) {
    let mut remote = MockConsultationRemote::new();
    let mut calls = 0;
    remote.expect_fetch_all().times(2).returning(move || {
        calls += 1;
        if calls == 1 {
            Ok(seeded())
        } else {
            Err(ConsultationRemoteError::unavailable("offline"))
        }
    });

    let store = loaded_store(remote, clock).await;
    store.fetch().await;

    assert_eq!(store.consultations().len(), 2);
    assert_eq!(store.last_error().as_deref(), Some(LOAD_FAILED));
    assert!(!store.is_loading());
}

#[rstest]
#[tokio::test]
async fn create_assigns_millisecond_id_and_timestamps(clock: Arc<MutableClock>) {
    let now = clock.utc();
    let store = loaded_store(accepting_remote(), clock).await;
    let draft = sample_draft("Consulta Dermatologia", ConsultationStatus::Scheduled, 20);

    let created = store.create(draft.clone()).await.expect("create");

    assert_eq!(created.id().as_ref(), now.timestamp_millis().to_string());
    assert_eq!(created.draft(), &draft);
    assert_eq!(created.created_at(), now);
    assert_eq!(created.updated_at(), now);
    assert_eq!(store.consultations().last(), Some(&created));
    assert_eq!(store.metrics().total_consultations, 3);
    assert_eq!(store.metrics().total_duration, 95);
}

#[rstest]
#[tokio::test]
async fn create_within_same_millisecond_yields_distinct_ids(clock: Arc<MutableClock>) {
    let store = loaded_store(accepting_remote(), clock).await;
    let draft = sample_draft("Consulta Dermatologia", ConsultationStatus::Scheduled, 20);

    let first = store.create(draft.clone()).await.expect("first create");
    let second = store.create(draft).await.expect("second create");

    assert_ne!(first.id(), second.id());
    let first_ms: i64 = first.id().as_ref().parse().expect("numeric id");
    let second_ms: i64 = second.id().as_ref().parse().expect("numeric id");
    assert_eq!(second_ms, first_ms + 1);
}

#[rstest]
#[tokio::test]
async fn create_sends_the_draft_to_the_remote(clock: Arc<MutableClock>) {
    let draft = sample_draft("Consulta Neurologia", ConsultationStatus::Scheduled, 60);
    let expected = draft.clone();
    let mut remote = MockConsultationRemote::new();
    remote
        .expect_submit()
        .withf(move |mutation| *mutation == ConsultationMutation::Create(expected.clone()))
        .times(1)
        .returning(|_| Ok(()));

    let store = ConsultationStore::new(Arc::new(remote), clock);
    store.create(draft).await.expect("create");
}

#[rstest]
#[tokio::test]
async fn rejected_create_records_error_and_leaves_collection(clock: Arc<MutableClock>) {
    let mut remote = MockConsultationRemote::new();
    remote.expect_fetch_all().returning(|| Ok(seeded()));
    remote
        .expect_submit()
        .returning(|_| Err(ConsultationRemoteError::rejected("quota exceeded")));
    let store = loaded_store(remote, clock).await;

    let error = store
        .create(sample_draft("Consulta", ConsultationStatus::Scheduled, 10))
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::OperationFailed);
    assert_eq!(error.message(), CREATE_FAILED);
    assert_eq!(store.last_error().as_deref(), Some(CREATE_FAILED));
    assert_eq!(store.consultations(), seeded());
    assert!(!store.is_loading());
}

#[rstest]
#[tokio::test]
async fn update_replaces_fields_and_keeps_identity(clock: Arc<MutableClock>) {
    let store = loaded_store(accepting_remote(), clock.clone()).await;
    let id = ConsultationId::new("1").expect("id");
    let original = store.get_by_id(&id).expect("seeded record");
    clock.advance(TimeDelta::minutes(5));
    let draft = sample_draft("Consulta Cardiologia", ConsultationStatus::Completed, 40);

    let revised = store.update(&id, draft.clone()).await.expect("update");

    assert_eq!(revised.id(), &id);
    assert_eq!(revised.created_at(), original.created_at());
    assert_eq!(revised.updated_at(), clock.utc());
    assert_eq!(revised.draft(), &draft);
    assert_eq!(store.get_by_id(&id), Some(revised));
    assert_eq!(store.metrics().completed_consultations, 2);
    assert_eq!(store.metrics().total_duration, 85);
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_id_is_not_found_without_remote_call(clock: Arc<MutableClock>) {
    let mut remote = MockConsultationRemote::new();
    remote.expect_fetch_all().returning(|| Ok(seeded()));
    remote.expect_submit().times(0);
    let store = loaded_store(remote, clock).await;
    let id = ConsultationId::new("999").expect("id");

    let error = store
        .update(&id, sample_draft("Consulta", ConsultationStatus::Scheduled, 10))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(store.consultations(), seeded());
}

#[rstest]
#[tokio::test]
async fn rejected_update_keeps_the_record(clock: Arc<MutableClock>) {
    let mut remote = MockConsultationRemote::new();
    remote.expect_fetch_all().returning(|| Ok(seeded()));
    remote
        .expect_submit()
        .returning(|_| Err(ConsultationRemoteError::unavailable("timeout")));
    let store = loaded_store(remote, clock).await;
    let id = ConsultationId::new("2").expect("id");

    let error = store
        .update(&id, sample_draft("Outra", ConsultationStatus::Cancelled, 15))
        .await
        .expect_err("rejected");

    assert_eq!(error.message(), UPDATE_FAILED);
    assert_eq!(store.get_by_id(&id), seeded().into_iter().nth(1));
}

#[rstest]
#[tokio::test]
async fn delete_removes_record_and_refreshes_metrics(clock: Arc<MutableClock>) {
    let store = loaded_store(accepting_remote(), clock).await;
    let id = ConsultationId::new("2").expect("id");

    store.delete(&id).await.expect("delete");

    assert_eq!(store.get_by_id(&id), None);
    let metrics = store.metrics();
    assert_eq!(metrics.total_consultations, 1);
    assert_eq!(metrics.completed_consultations, 0);
    assert_eq!(metrics.attendance_rate, 0.0);
}

#[rstest]
#[tokio::test]
async fn delete_of_absent_id_is_a_no_op(clock: Arc<MutableClock>) {
    let store = loaded_store(accepting_remote(), clock).await;

    store
        .delete(&ConsultationId::new("404").expect("id"))
        .await
        .expect("delete");

    assert_eq!(store.consultations(), seeded());
    assert_eq!(store.last_error(), None);
}

#[rstest]
#[tokio::test]
async fn next_operation_clears_previous_error(clock: Arc<MutableClock>) {
    let mut remote = MockConsultationRemote::new();
    remote.expect_fetch_all().returning(|| Ok(seeded()));
    let mut first = true;
    remote.expect_submit().returning(move |_| {
        if std::mem::take(&mut first) {
            Err(ConsultationRemoteError::unavailable("blip"))
        } else {
            Ok(())
        }
    });
    let store = loaded_store(remote, clock).await;
    let id = ConsultationId::new("1").expect("id");

    store.delete(&id).await.expect_err("first delete fails");
    assert_eq!(store.last_error().as_deref(), Some(DELETE_FAILED));

    store.delete(&id).await.expect("second delete");
    assert_eq!(store.last_error(), None);
}
