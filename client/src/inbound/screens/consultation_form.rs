//! Add and edit consultation flows.
//!
//! Both flows validate the whole form first and only reach the store once
//! every field passes.

use tracing::debug;

use crate::domain::{ConsultationForm, ConsultationId, FieldErrors};
use crate::inbound::routes::Route;
use crate::inbound::state::AppState;

/// Banner shown when a create is rejected.
pub const CREATE_RETRY: &str = "Erro ao criar consulta. Tente novamente.";
/// Banner shown when an update is rejected.
pub const UPDATE_RETRY: &str = "Erro ao atualizar consulta. Tente novamente.";

/// Result of submitting a consultation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Saved; navigate to the route.
    Saved(Route),
    /// Field messages to show next to the inputs.
    Invalid(FieldErrors),
    /// The store refused the change; show the banner and keep the form.
    Failed { message: &'static str },
}

/// How the edit screen opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditScreen {
    /// Form prefilled with the stored values.
    Prefilled {
        id: ConsultationId,
        form: ConsultationForm,
    },
    /// The consultation does not exist; leave the screen.
    Redirect(Route),
}

/// Blank form for the add screen.
pub fn new_consultation_form() -> ConsultationForm {
    ConsultationForm::default()
}

/// Validate and create a consultation.
pub async fn submit_new(state: &AppState, form: &ConsultationForm) -> FormOutcome {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return FormOutcome::Invalid(errors),
    };
    match state.consultations.create(draft).await {
        Ok(_) => FormOutcome::Saved(Route::Dashboard),
        Err(error) => {
            debug!(code = ?error.code(), "create failed");
            FormOutcome::Failed {
                message: CREATE_RETRY,
            }
        }
    }
}

/// Open the edit screen for `id`.
pub fn load_edit(state: &AppState, id: &ConsultationId) -> EditScreen {
    match state.consultations.get_by_id(id) {
        Some(consultation) => EditScreen::Prefilled {
            id: id.clone(),
            form: ConsultationForm::from_consultation(&consultation),
        },
        None => EditScreen::Redirect(Route::Dashboard),
    }
}

/// Validate and apply an edit to `id`.
pub async fn submit_edit(
    state: &AppState,
    id: &ConsultationId,
    form: &ConsultationForm,
) -> FormOutcome {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return FormOutcome::Invalid(errors),
    };
    match state.consultations.update(id, draft).await {
        Ok(_) => FormOutcome::Saved(Route::Dashboard),
        Err(error) => {
            debug!(code = ?error.code(), %id, "update failed");
            FormOutcome::Failed {
                message: UPDATE_RETRY,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{ConsultationRemoteError, MockConsultationRemote};
    use crate::domain::{ConsultationStatus, FormField};
    use crate::outbound::remote::seed_consultations;
    use crate::test_support::{MutableClock, app_state, app_state_with_remote};
    use rstest::{fixture, rstest};

    #[fixture]
    fn filled() -> ConsultationForm {
        ConsultationForm {
            patient_id: "1".to_owned(),
            patient_name: "Pedro Silva".to_owned(),
            kind: "Consulta Dermatologia".to_owned(),
            description: "Avaliação de pele".to_owned(),
            duration: "20".to_owned(),
            date: "2025-11-20".to_owned(),
            status: "scheduled".to_owned(),
        }
    }

    fn id(raw: &str) -> ConsultationId {
        ConsultationId::new(raw).expect("id")
    }

    fn failing_remote(fetches: bool) -> MockConsultationRemote {
        let mut remote = MockConsultationRemote::new();
        if fetches {
            remote.expect_fetch_all().returning(seed_consultations);
        }
        remote
            .expect_submit()
            .returning(|_| Err(ConsultationRemoteError::rejected("nope")));
        remote
    }

    #[rstest]
    fn new_form_defaults_to_scheduled() {
        let form = new_consultation_form();
        assert_eq!(form.status, "scheduled");
        assert!(form.patient_name.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn valid_form_creates_and_returns_home(filled: ConsultationForm) {
        let state = app_state(Arc::new(MutableClock::fixed()));
        state.consultations.fetch().await;

        let outcome = submit_new(&state, &filled).await;

        assert_eq!(outcome, FormOutcome::Saved(Route::Dashboard));
        let consultations = state.consultations.consultations();
        assert_eq!(consultations.len(), 3);
        assert_eq!(consultations[2].kind(), "Consulta Dermatologia");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_form_never_reaches_the_store(mut filled: ConsultationForm) {
        let mut remote = MockConsultationRemote::new();
        remote.expect_submit().times(0);
        let state = app_state_with_remote(Arc::new(remote), Arc::new(MutableClock::fixed()));
        filled.duration = "abc".to_owned();
        filled.patient_name = "Al".to_owned();

        let outcome = submit_new(&state, &filled).await;

        let FormOutcome::Invalid(errors) = outcome else {
            panic!("expected field errors, got {outcome:?}");
        };
        assert_eq!(errors.get(FormField::Duration), Some("Duração deve ser um número"));
        assert_eq!(
            errors.get(FormField::PatientName),
            Some("Nome deve ter no mínimo 3 caracteres")
        );
        assert!(state.consultations.consultations().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_create_shows_retry_banner(filled: ConsultationForm) {
        let state = app_state_with_remote(
            Arc::new(failing_remote(false)),
            Arc::new(MutableClock::fixed()),
        );

        assert_eq!(
            submit_new(&state, &filled).await,
            FormOutcome::Failed {
                message: CREATE_RETRY
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn edit_prefills_from_the_stored_record() {
        let state = app_state(Arc::new(MutableClock::fixed()));
        state.consultations.fetch().await;

        let screen = load_edit(&state, &id("2"));

        let EditScreen::Prefilled { id: loaded, form } = screen else {
            panic!("expected prefilled form, got {screen:?}");
        };
        assert_eq!(loaded, id("2"));
        assert_eq!(form.kind, "Consulta Ortopedia");
        assert_eq!(form.duration, "45");
        assert_eq!(form.date, "2025-10-28");
        assert_eq!(form.status, "completed");
    }

    #[rstest]
    #[tokio::test]
    async fn edit_of_unknown_id_redirects_home() {
        let state = app_state(Arc::new(MutableClock::fixed()));
        state.consultations.fetch().await;

        assert_eq!(
            load_edit(&state, &id("77")),
            EditScreen::Redirect(Route::Dashboard)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn edit_submission_updates_the_record() {
        let state = app_state(Arc::new(MutableClock::fixed()));
        state.consultations.fetch().await;
        let EditScreen::Prefilled { mut form, .. } = load_edit(&state, &id("1")) else {
            panic!("seed record missing");
        };
        form.status = "cancelled".to_owned();

        let outcome = submit_edit(&state, &id("1"), &form).await;

        assert_eq!(outcome, FormOutcome::Saved(Route::Dashboard));
        let stored = state.consultations.get_by_id(&id("1")).expect("record");
        assert_eq!(stored.status(), ConsultationStatus::Cancelled);
        assert_eq!(state.consultations.metrics().cancelled_consultations, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_edit_shows_retry_banner(filled: ConsultationForm) {
        let state = app_state_with_remote(
            Arc::new(failing_remote(true)),
            Arc::new(MutableClock::fixed()),
        );
        state.consultations.fetch().await;

        assert_eq!(
            submit_edit(&state, &id("1"), &filled).await,
            FormOutcome::Failed {
                message: UPDATE_RETRY
            }
        );
        assert_eq!(
            state.consultations.get_by_id(&id("1")),
            seed_consultations().expect("seed").into_iter().next()
        );
    }
}
