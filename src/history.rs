//! Confirmed appointment history.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{AppointmentDraft, AppointmentType, PUBLIC_HEALTH_CENTERS};

/// Confirmed appointments, most recent confirmation first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<AppointmentDraft>,
}

impl History {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History preloaded with the patient's two earlier visits.
    pub fn seeded() -> Self {
        let entries = vec![
            AppointmentDraft {
                id: Some("pre-1".to_string()),
                week: Some("5 semanas".to_string()),
                appointment_type: Some(AppointmentType::Regular),
                health_center: Some(PUBLIC_HEALTH_CENTERS[2].to_string()),
                selected_date_time: Some("10 de Diciembre - 09:00 AM".to_string()),
                selected_doctor: Some("Mendoza, L.".to_string()),
                tentative_date: NaiveDate::from_ymd_opt(2024, 12, 10),
                blood_pressure: Some("110/70".to_string()),
                weight: Some("62.5 kg".to_string()),
                fetal_heart_rate: Some("145 lpm".to_string()),
                notes: Some(
                    "Paciente presenta buen progreso. Se recomienda continuar con suplementos \
                     de ácido fólico y mantener dieta balanceada."
                        .to_string(),
                ),
            },
            AppointmentDraft {
                id: Some("pre-2".to_string()),
                week: Some("8 semanas".to_string()),
                appointment_type: Some(AppointmentType::Ultrasound),
                health_center: Some(PUBLIC_HEALTH_CENTERS[1].to_string()),
                selected_date_time: Some("25 de Enero - 16:00 PM".to_string()),
                selected_doctor: Some("Sánchez, M.".to_string()),
                tentative_date: NaiveDate::from_ymd_opt(2025, 1, 25),
                blood_pressure: Some("120/80".to_string()),
                weight: Some("64.2 kg".to_string()),
                fetal_heart_rate: Some("152 lpm".to_string()),
                notes: Some(
                    "Ecografía morfológica inicial. El embrión presenta medidas acordes a la \
                     edad gestacional. Actividad cardíaca presente y normal."
                        .to_string(),
                ),
            },
        ];

        debug!("Seeded history with {} entries", entries.len());
        History { entries }
    }

    /// Add a confirmed appointment in front of all others.
    pub(crate) fn prepend(&mut self, appointment: AppointmentDraft) {
        self.entries.insert(0, appointment);
    }

    /// First entry booked under exactly this date-time string.
    pub fn find_by_date_time(&self, date_time: &str) -> Option<&AppointmentDraft> {
        self.entries
            .iter()
            .find(|entry| entry.selected_date_time.as_deref() == Some(date_time))
    }

    pub fn get(&self, id: &str) -> Option<&AppointmentDraft> {
        self.entries
            .iter()
            .find(|entry| entry.id.as_deref() == Some(id))
    }

    pub fn entries(&self) -> &[AppointmentDraft] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AppointmentDraft> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a AppointmentDraft;
    type IntoIter = std::slice::Iter<'a, AppointmentDraft>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
