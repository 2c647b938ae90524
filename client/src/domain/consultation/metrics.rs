//! Dashboard aggregates derived from the consultation collection.

use serde::{Deserialize, Serialize};

use super::{Consultation, ConsultationStatus};

/// Aggregate view shown on the dashboard cards.
///
/// Always recomputed from the full collection via
/// [`DashboardMetrics::from_consultations`]; never patched incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_consultations: usize,
    pub completed_consultations: usize,
    pub cancelled_consultations: usize,
    /// Sum of every consultation's duration, in minutes.
    pub total_duration: u64,
    /// Completed share of all consultations as a percentage; `0.0` when empty.
    pub attendance_rate: f64,
}

impl DashboardMetrics {
    /// Compute the metrics for `consultations`.
    ///
    /// # Examples
    /// ```
    /// use conectahc::domain::DashboardMetrics;
    ///
    /// let metrics = DashboardMetrics::from_consultations(&[]);
    /// assert_eq!(metrics.total_consultations, 0);
    /// assert_eq!(metrics.attendance_rate, 0.0);
    /// ```
    pub fn from_consultations(consultations: &[Consultation]) -> Self {
        let total_consultations = consultations.len();
        let completed_consultations =
            count_with_status(consultations, ConsultationStatus::Completed);
        let cancelled_consultations =
            count_with_status(consultations, ConsultationStatus::Cancelled);
        let total_duration = consultations
            .iter()
            .map(|consultation| u64::from(consultation.duration_minutes()))
            .sum();

        Self {
            total_consultations,
            completed_consultations,
            cancelled_consultations,
            total_duration,
            attendance_rate: percentage(completed_consultations, total_consultations),
        }
    }
}

fn count_with_status(consultations: &[Consultation], status: ConsultationStatus) -> usize {
    consultations
        .iter()
        .filter(|consultation| consultation.status() == status)
        .count()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}
