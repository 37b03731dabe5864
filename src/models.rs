//! Data models for the prenatal appointment booking flow.
//!
//! This module defines the core data structures used throughout the system:
//! - AppointmentType: the kind of prenatal visit
//! - AppointmentDraft: the record filled in across the booking flow, which
//!   becomes a history entry once confirmed
//! - The public health center catalogue and its suggestion search

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BookingError, DateRejection};
use crate::validation::validate_date;

/// Kinds of prenatal appointments offered by the schedule form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Regular,
    HighRisk,
    Ultrasound,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 3] = [
        AppointmentType::Regular,
        AppointmentType::HighRisk,
        AppointmentType::Ultrasound,
    ];

    /// Convert a string to an AppointmentType value.
    pub fn from_string(value: &str) -> Result<Self, BookingError> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "regular" => Ok(AppointmentType::Regular),
            "high_risk" => Ok(AppointmentType::HighRisk),
            "ultrasound" => Ok(AppointmentType::Ultrasound),
            _ => Err(BookingError::InvalidAppointmentType(value.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentType::Regular => "REGULAR",
            AppointmentType::HighRisk => "HIGH_RISK",
            AppointmentType::Ultrasound => "ULTRASOUND",
        }
    }

    /// Title shown on the type picker.
    pub fn title(&self) -> &'static str {
        match self {
            AppointmentType::Regular => "Control Regular",
            AppointmentType::HighRisk => "Alto Riesgo",
            AppointmentType::Ultrasound => "Ecografía",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AppointmentType::Regular => "Seguimiento prenatal estándar",
            AppointmentType::HighRisk => "Atención especializada",
            AppointmentType::Ultrasound => "Examen de ultrasonido",
        }
    }

    /// Label used on the review screen.
    pub fn review_label(&self) -> &'static str {
        match self {
            AppointmentType::Regular => "Control prenatal",
            other => other.name(),
        }
    }

    /// Short label used on calendar entries.
    pub fn chip_label(&self) -> &'static str {
        match self {
            AppointmentType::Regular => "Control",
            other => other.name(),
        }
    }
}

impl std::fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An appointment being booked, or a confirmed history entry.
///
/// Every field is optional while the booking flow fills it in. A draft
/// becomes a history entry when the scheduler assigns its `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub id: Option<String>,
    pub week: Option<String>,
    #[serde(rename = "type")]
    pub appointment_type: Option<AppointmentType>,
    pub health_center: Option<String>,
    pub tentative_date: Option<NaiveDate>,
    pub selected_date_time: Option<String>,
    pub selected_doctor: Option<String>,

    // Medical record, only present on historical entries
    pub notes: Option<String>,
    pub weight: Option<String>,
    pub blood_pressure: Option<String>,
    pub fetal_heart_rate: Option<String>,
}

/// Treat an empty string the same as an absent value.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl AppointmentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything entered so far, as "new appointment" does.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_confirmed(&self) -> bool {
        is_filled(&self.id)
    }

    pub fn set_week(&mut self, week: &str) {
        self.week = non_empty(week);
    }

    pub fn set_type(&mut self, appointment_type: AppointmentType) {
        self.appointment_type = Some(appointment_type);
    }

    /// Set the health center exactly as entered. Moving to a different
    /// center drops the specialist and time chosen for the previous one.
    pub fn set_health_center(&mut self, center: &str) {
        let center = if center.trim().is_empty() {
            None
        } else {
            Some(center.to_string())
        };
        if center != self.health_center {
            debug!("Health center changed to {:?}", center);
            self.selected_doctor = None;
            self.selected_date_time = None;
        }
        self.health_center = center;
    }

    /// Run the date picker value through the validator.
    ///
    /// An accepted date is stored; a rejected one leaves the field empty.
    /// An empty input simply clears the field.
    pub fn apply_date(&mut self, date_str: &str) -> Result<(), DateRejection> {
        if date_str.trim().is_empty() {
            self.tentative_date = None;
            return Ok(());
        }

        match validate_date(date_str) {
            Ok(date) => {
                self.tentative_date = Some(date);
                Ok(())
            }
            Err(rejection) => {
                self.tentative_date = None;
                Err(rejection)
            }
        }
    }
}

/// Public health facilities offered as suggestions on the schedule form.
pub const PUBLIC_HEALTH_CENTERS: [&str; 16] = [
    "Hospital Nacional Arzobispo Loayza",
    "Instituto Nacional Materno Perinatal (Maternidad de Lima)",
    "Hospital Nacional Edgardo Rebagliati Martins",
    "Hospital Nacional Guillermo Almenara Irigoyen",
    "Hospital Nacional Alberto Sabogal Sologuren",
    "Hospital María Auxiliadora",
    "Hospital San Bartolomé",
    "Hospital de Emergencias José Casimiro Ulloa",
    "Hospital Nacional Dos de Mayo",
    "Hospital Hipólito Unanue",
    "Hospital Sergio Bernales (Collique)",
    "Policlínico Pablo Bermúdez",
    "Centro de Salud Jesús María",
    "Centro de Salud Surco",
    "Hospital de la Solidaridad - Comas",
    "Hospital de la Solidaridad - Villa El Salvador",
];

/// Suggest catalogue centers whose name contains the query.
///
/// Matching is case-insensitive and only starts once the query has at
/// least two characters.
pub fn search_health_centers(query: &str) -> Vec<&'static str> {
    if query.chars().count() <= 1 {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    PUBLIC_HEALTH_CENTERS
        .iter()
        .copied()
        .filter(|center| center.to_lowercase().contains(&needle))
        .collect()
}

/// Gestational week labels offered by the week selector.
pub fn gestational_weeks() -> Vec<String> {
    (1..=40).map(|week| format!("{} semanas", week)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_type_parses_codes() {
        assert_eq!(
            AppointmentType::from_string("high_risk").unwrap(),
            AppointmentType::HighRisk
        );
        assert_eq!(
            AppointmentType::from_string(" ULTRASOUND ").unwrap(),
            AppointmentType::Ultrasound
        );
        assert!(AppointmentType::from_string("checkup").is_err());
    }

    #[test]
    fn appointment_type_serializes_as_code() {
        let json = serde_json::to_string(&AppointmentType::HighRisk).unwrap();
        assert_eq!(json, "\"HIGH_RISK\"");
    }

    #[test]
    fn labels_only_rename_regular() {
        assert_eq!(AppointmentType::Regular.review_label(), "Control prenatal");
        assert_eq!(AppointmentType::Ultrasound.review_label(), "ULTRASOUND");
        assert_eq!(AppointmentType::Regular.chip_label(), "Control");
        assert_eq!(AppointmentType::HighRisk.chip_label(), "HIGH_RISK");
    }

    #[test]
    fn changing_center_clears_doctor_and_time() {
        let mut draft = AppointmentDraft::new();
        draft.set_health_center("Hospital San Bartolomé");
        draft.selected_doctor = Some("Morales, J.".to_string());
        draft.selected_date_time = Some("3 de diciembre de 2024 - 08:00 AM".to_string());

        draft.set_health_center("Hospital San Bartolomé");
        assert!(draft.selected_doctor.is_some());

        draft.set_health_center("Hospital María Auxiliadora");
        assert!(draft.selected_doctor.is_none());
        assert!(draft.selected_date_time.is_none());
    }

    #[test]
    fn center_is_stored_as_typed() {
        let mut draft = AppointmentDraft::new();
        draft.set_health_center(" Clínica Milagros");
        assert_eq!(draft.health_center.as_deref(), Some(" Clínica Milagros"));

        draft.set_health_center("   ");
        assert!(draft.health_center.is_none());
    }

    #[test]
    fn every_type_has_a_description() {
        for kind in AppointmentType::ALL {
            assert!(!kind.description().is_empty());
        }
        assert_eq!(AppointmentType::Ultrasound.description(), "Examen de ultrasonido");
    }

    #[test]
    fn rejected_date_leaves_field_empty() {
        let mut draft = AppointmentDraft::new();
        draft.apply_date("2024-12-03").unwrap();
        assert!(draft.tentative_date.is_some());

        assert_eq!(draft.apply_date("2024-12-08"), Err(DateRejection::Holiday));
        assert!(draft.tentative_date.is_none());
    }

    #[test]
    fn empty_date_clears_without_error() {
        let mut draft = AppointmentDraft::new();
        draft.apply_date("2024-12-03").unwrap();
        assert!(draft.apply_date("").is_ok());
        assert!(draft.tentative_date.is_none());
    }

    #[test]
    fn center_search_needs_two_characters() {
        assert!(search_health_centers("H").is_empty());
        let matches = search_health_centers("solidaridad");
        assert_eq!(
            matches,
            vec![
                "Hospital de la Solidaridad - Comas",
                "Hospital de la Solidaridad - Villa El Salvador",
            ]
        );
    }

    #[test]
    fn week_labels_cover_full_term() {
        let weeks = gestational_weeks();
        assert_eq!(weeks.len(), 40);
        assert_eq!(weeks[0], "1 semanas");
        assert_eq!(weeks[39], "40 semanas");
    }

    #[test]
    fn draft_serializes_with_camel_case_keys() {
        let mut draft = AppointmentDraft::new();
        draft.set_type(AppointmentType::Regular);
        draft.set_health_center("Centro de Salud Surco");
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "REGULAR");
        assert_eq!(value["healthCenter"], "Centro de Salud Surco");
    }
}
