//! Specialist and time-slot selection.
//!
//! The selector composes `selected_date_time`, the string that identifies
//! a booking when checking for conflicts.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::directory::{has_specialist, specialists_for};
use crate::error::{BookingError, BookingStage};
use crate::models::{is_filled, AppointmentDraft};

/// Bookable times of day, in display order.
pub const TIME_SLOTS: [&str; 5] = ["08:00 AM", "10:30 AM", "14:00 PM", "16:00 PM", "18:30 PM"];

/// Shown in place of a date that has not been picked yet.
pub const DATE_PLACEHOLDER: &str = "Seleccionar Fecha";

const DATE_TIME_SEPARATOR: &str = " - ";

const MONTHS_LOWER: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long-form Spanish date, e.g. "3 de diciembre de 2024".
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS_LOWER[date.month0() as usize],
            date.year()
        ),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

/// Build the "<date> - <time>" string used as the booking identity.
pub fn compose_date_time(date: Option<NaiveDate>, time: &str) -> String {
    format!("{}{}{}", format_date(date), DATE_TIME_SEPARATOR, time)
}

/// Doctors the picker offers. Nothing is offered until a center is set.
pub fn doctor_options(draft: &AppointmentDraft) -> Vec<&'static str> {
    match draft.health_center.as_deref() {
        Some(center) if !center.is_empty() => specialists_for(center).to_vec(),
        _ => Vec::new(),
    }
}

/// Choose a specialist. Any previously chosen time is dropped.
pub fn select_doctor(draft: &mut AppointmentDraft, doctor: &str) -> Result<(), BookingError> {
    let center = match draft.health_center.as_deref() {
        Some(center) if !center.is_empty() => center,
        _ => return Err(BookingError::CenterRequired),
    };

    if !has_specialist(center, doctor) {
        return Err(BookingError::UnknownSpecialist {
            center: center.to_string(),
            doctor: doctor.to_string(),
        });
    }

    debug!("Selected doctor {} at {}", doctor, center);
    draft.selected_doctor = Some(doctor.to_string());
    draft.selected_date_time = None;
    Ok(())
}

/// Choose a time slot, composing the booking's date-time string.
pub fn select_time(draft: &mut AppointmentDraft, time: &str) -> Result<(), BookingError> {
    if !is_filled(&draft.selected_doctor) {
        return Err(BookingError::DoctorRequired);
    }
    if draft.tentative_date.is_none() {
        return Err(BookingError::DateRequired);
    }
    if !TIME_SLOTS.contains(&time) {
        return Err(BookingError::UnknownTimeSlot(time.to_string()));
    }

    let composed = compose_date_time(draft.tentative_date, time);
    debug!("Selected slot {}", composed);
    draft.selected_date_time = Some(composed);
    Ok(())
}

/// The time portion of the chosen slot, if any.
pub fn selected_time(draft: &AppointmentDraft) -> Option<&str> {
    draft
        .selected_date_time
        .as_deref()
        .and_then(|value| value.split(DATE_TIME_SEPARATOR).nth(1))
}

/// Whether the schedule form may move on to slot selection.
pub fn can_search_availability(draft: &AppointmentDraft) -> bool {
    draft.appointment_type.is_some()
        && draft.tentative_date.is_some()
        && is_filled(&draft.health_center)
}

/// Whether slot selection may move on to review.
pub fn can_review(draft: &AppointmentDraft) -> bool {
    is_filled(&draft.selected_date_time)
        && is_filled(&draft.selected_doctor)
        && is_filled(&draft.health_center)
}

pub fn ensure_stage(draft: &AppointmentDraft, stage: BookingStage) -> Result<(), BookingError> {
    let ready = match stage {
        BookingStage::Availability => can_search_availability(draft),
        BookingStage::Review => can_review(draft),
    };

    if ready {
        Ok(())
    } else {
        Err(BookingError::IncompleteDraft(stage))
    }
}
