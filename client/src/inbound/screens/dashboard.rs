//! Dashboard: metrics cards, the consultation table and row actions.

use crate::domain::{Consultation, ConsultationId, DashboardMetrics};
use crate::inbound::routes::Route;
use crate::inbound::state::AppState;

/// Prompt the user must accept before a row is deleted.
pub const DELETE_CONFIRMATION: &str = "Tem certeza que deseja excluir esta consulta?";
/// Table placeholder when there are no consultations.
pub const EMPTY_LIST: &str = "Nenhuma consulta encontrada";
/// Placeholder while the store is busy.
pub const LOADING_MESSAGE: &str = "Carregando...";

/// One table row, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationRow {
    pub id: ConsultationId,
    pub kind: String,
    pub description: String,
    pub date: String,
    pub duration: String,
    pub status: &'static str,
    pub edit: Route,
}

impl From<&Consultation> for ConsultationRow {
    fn from(consultation: &Consultation) -> Self {
        Self {
            id: consultation.id().clone(),
            kind: consultation.kind().to_owned(),
            description: consultation.description().to_owned(),
            date: consultation.date().format("%d/%m/%Y").to_string(),
            duration: format!("{} min", consultation.duration_minutes()),
            status: consultation.status().label(),
            edit: Route::EditConsultation(consultation.id().clone()),
        }
    }
}

/// Everything the dashboard renders once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    pub greeting: Option<String>,
    pub metrics: DashboardMetrics,
    pub attendance: String,
    pub rows: Vec<ConsultationRow>,
    pub placeholder: Option<&'static str>,
    pub error: Option<String>,
}

/// Dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loading,
    Ready(DashboardPage),
}

/// Result of a delete request from a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing happened.
    Cancelled,
    Deleted,
    Failed { message: String },
}

/// Render the dashboard from the current store contents.
pub fn dashboard_view(state: &AppState) -> DashboardView {
    let snapshot = state.consultations.snapshot();
    if snapshot.loading {
        return DashboardView::Loading;
    }

    let rows: Vec<ConsultationRow> = snapshot.consultations.iter().map(Into::into).collect();
    DashboardView::Ready(DashboardPage {
        greeting: state
            .session
            .current_user()
            .map(|user| format!("Olá, {}", user.name())),
        metrics: snapshot.metrics,
        attendance: format!("{:.1}%", snapshot.metrics.attendance_rate),
        placeholder: rows.is_empty().then_some(EMPTY_LIST),
        rows,
        error: snapshot.error,
    })
}

/// Delete `id` once the user has accepted [`DELETE_CONFIRMATION`].
pub async fn delete_consultation(
    state: &AppState,
    id: &ConsultationId,
    confirmed: bool,
) -> DeleteOutcome {
    if !confirmed {
        return DeleteOutcome::Cancelled;
    }
    match state.consultations.delete(id).await {
        Ok(()) => DeleteOutcome::Deleted,
        Err(error) => DeleteOutcome::Failed {
            message: error.message().to_owned(),
        },
    }
}
