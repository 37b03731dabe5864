//! Booking confirmation with conflict detection.
//!
//! This module provides the AppointmentScheduler struct which owns the
//! booking session: the draft being filled in, the confirmed history and
//! the id generator used when a draft is confirmed.

use tracing::{info, warn};
use uuid::Uuid;

use crate::availability::ensure_stage;
use crate::directory::has_specialist;
use crate::error::{BookingError, BookingStage};
use crate::history::History;
use crate::models::AppointmentDraft;
use crate::validation::check_working_day;

/// Source of ids for confirmed appointments.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic counter ids ("apt-1", "apt-2", ...).
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        SequentialIds {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("apt")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Where a draft stands once it reaches the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Reviewing,
    /// Added to history under the given id.
    Confirmed { id: String },
    /// Another entry already holds the same date-time string.
    Conflicted {
        date_time: String,
        existing_id: Option<String>,
    },
}

impl ReviewState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewState::Reviewing)
    }
}

/// What the patient chose on the conflict screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Go back to slot selection keeping center, doctor and date.
    ChangeTime,
    /// Drop the booking altogether.
    Abandon,
}

/// History entry whose date-time string equals the draft's, if any.
///
/// Only the composed string is compared. Doctor and center play no part.
pub fn check_conflict<'a>(
    history: &'a History,
    draft: &AppointmentDraft,
) -> Option<&'a AppointmentDraft> {
    let date_time = draft.selected_date_time.as_deref()?;
    history.find_by_date_time(date_time)
}

/// Re-check the specialist and the date of a draft about to be booked.
///
/// Drafts can be edited directly, so the checks done by the selectors are
/// repeated here.
fn ensure_bookable(draft: &AppointmentDraft) -> Result<(), BookingError> {
    let center = draft.health_center.as_deref().unwrap_or_default();
    let doctor = draft.selected_doctor.as_deref().unwrap_or_default();
    if !has_specialist(center, doctor) {
        return Err(BookingError::UnknownSpecialist {
            center: center.to_string(),
            doctor: doctor.to_string(),
        });
    }

    let date = draft.tentative_date.ok_or(BookingError::DateRequired)?;
    check_working_day(date).map_err(BookingError::UnavailableDate)
}

/// Confirm `draft` against `history`.
///
/// A conflicting draft leaves history untouched. Otherwise the draft is
/// given a fresh id and a copy of it is placed at the front of history.
pub fn confirm(
    history: &mut History,
    draft: &mut AppointmentDraft,
    ids: &mut dyn IdGenerator,
) -> Result<ReviewState, BookingError> {
    ensure_stage(draft, BookingStage::Review)?;
    if let Err(err) = ensure_bookable(draft) {
        warn!("Refusing to confirm draft: {}", err);
        return Err(err);
    }

    if let Some(existing) = check_conflict(history, draft) {
        let date_time = draft.selected_date_time.clone().unwrap_or_default();
        warn!(
            "Conflict detected: {} already booked (entry {:?})",
            date_time, existing.id
        );
        return Ok(ReviewState::Conflicted {
            date_time,
            existing_id: existing.id.clone(),
        });
    }

    let id = ids.next_id();
    draft.id = Some(id.clone());
    history.prepend(draft.clone());

    info!(
        "Confirmed appointment {} for {} with {} at {}",
        id,
        draft.selected_date_time.as_deref().unwrap_or_default(),
        draft.selected_doctor.as_deref().unwrap_or_default(),
        draft.health_center.as_deref().unwrap_or_default()
    );

    Ok(ReviewState::Confirmed { id })
}

/// A single patient's booking session.
pub struct AppointmentScheduler {
    history: History,
    draft: AppointmentDraft,
    state: ReviewState,
    ids: Box<dyn IdGenerator>,
}

impl AppointmentScheduler {
    /// Initialize the scheduler.
    pub fn new(history: History, ids: Box<dyn IdGenerator>) -> Self {
        AppointmentScheduler {
            history,
            draft: AppointmentDraft::new(),
            state: ReviewState::Reviewing,
            ids,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn draft(&self) -> &AppointmentDraft {
        &self.draft
    }

    /// Mutable access for the schedule form and slot selection.
    pub fn draft_mut(&mut self) -> &mut AppointmentDraft {
        &mut self.draft
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// Start a new appointment from an empty draft.
    pub fn new_appointment(&mut self) {
        self.draft.reset();
        self.state = ReviewState::Reviewing;
    }

    /// Leave the schedule form for slot selection.
    pub fn proceed_to_availability(&self) -> Result<(), BookingError> {
        ensure_stage(&self.draft, BookingStage::Availability)
    }

    /// Leave slot selection for the review screen.
    pub fn proceed_to_review(&mut self) -> Result<(), BookingError> {
        ensure_stage(&self.draft, BookingStage::Review)?;
        self.state = ReviewState::Reviewing;
        Ok(())
    }

    /// Confirm the current draft.
    pub fn confirm(&mut self) -> Result<ReviewState, BookingError> {
        let state = confirm(&mut self.history, &mut self.draft, self.ids.as_mut())?;
        self.state = state.clone();
        Ok(state)
    }

    /// Act on the choice made on the conflict screen.
    pub fn resolve_conflict(&mut self, resolution: ConflictResolution) {
        match resolution {
            ConflictResolution::ChangeTime => {
                self.draft.selected_date_time = None;
            }
            ConflictResolution::Abandon => {
                self.draft.reset();
            }
        }
        self.state = ReviewState::Reviewing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{select_doctor, select_time};
    use crate::error::DateRejection;
    use crate::models::AppointmentType;
    use chrono::NaiveDate;

    fn ready_draft(date: &str, time: &str) -> AppointmentDraft {
        let mut draft = AppointmentDraft::new();
        draft.set_type(AppointmentType::HighRisk);
        draft.set_week("12 semanas");
        draft.set_health_center("Hospital María Auxiliadora");
        draft.apply_date(date).unwrap();
        select_doctor(&mut draft, "Ruiz, G.").unwrap();
        select_time(&mut draft, time).unwrap();
        draft
    }

    #[test]
    fn sequential_ids_increase() {
        let mut ids = SequentialIds::new("cita");
        assert_eq!(ids.next_id(), "cita-1");
        assert_eq!(ids.next_id(), "cita-2");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn confirm_refuses_incomplete_draft() {
        let mut history = History::seeded();
        let mut draft = AppointmentDraft::new();
        let result = confirm(&mut history, &mut draft, &mut SequentialIds::default());
        assert_eq!(
            result,
            Err(BookingError::IncompleteDraft(BookingStage::Review))
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn confirm_prepends_with_fresh_id() {
        let mut history = History::seeded();
        let mut draft = ready_draft("2024-12-11", "10:30 AM");
        let mut ids = SequentialIds::default();

        let state = confirm(&mut history, &mut draft, &mut ids).unwrap();

        assert_eq!(state, ReviewState::Confirmed { id: "apt-1".to_string() });
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0], draft);
        assert_eq!(draft.id.as_deref(), Some("apt-1"));
    }

    #[test]
    fn confirm_rechecks_edited_draft() {
        let mut history = History::seeded();
        let mut ids = SequentialIds::default();

        let mut draft = ready_draft("2024-12-11", "10:30 AM");
        draft.selected_doctor = Some("Nobody, X.".to_string());
        assert_eq!(
            confirm(&mut history, &mut draft, &mut ids),
            Err(BookingError::UnknownSpecialist {
                center: "Hospital María Auxiliadora".to_string(),
                doctor: "Nobody, X.".to_string(),
            })
        );

        let mut draft = ready_draft("2024-12-11", "10:30 AM");
        draft.tentative_date = NaiveDate::from_ymd_opt(2024, 12, 14);
        assert_eq!(
            confirm(&mut history, &mut draft, &mut ids),
            Err(BookingError::UnavailableDate(DateRejection::Weekend))
        );

        let mut draft = ready_draft("2024-12-11", "10:30 AM");
        draft.tentative_date = None;
        assert_eq!(
            confirm(&mut history, &mut draft, &mut ids),
            Err(BookingError::DateRequired)
        );

        assert_eq!(history.len(), 2);
        assert!(draft.id.is_none());
    }

    #[test]
    fn same_string_conflicts_regardless_of_doctor() {
        let mut history = History::seeded();
        let mut ids = SequentialIds::default();

        let mut first = ready_draft("2024-12-11", "10:30 AM");
        confirm(&mut history, &mut first, &mut ids).unwrap();

        let mut second = ready_draft("2024-12-11", "10:30 AM");
        select_doctor(&mut second, "García, P.").unwrap();
        select_time(&mut second, "10:30 AM").unwrap();

        let state = confirm(&mut history, &mut second, &mut ids).unwrap();
        assert_eq!(
            state,
            ReviewState::Conflicted {
                date_time: "11 de diciembre de 2024 - 10:30 AM".to_string(),
                existing_id: Some("apt-1".to_string()),
            }
        );
        assert_eq!(history.len(), 3);
        assert!(second.id.is_none());
    }

    #[test]
    fn conflict_decision_is_repeatable() {
        let mut history = History::seeded();
        let mut ids = SequentialIds::default();
        let mut draft = ready_draft("2024-12-11", "08:00 AM");
        draft.selected_date_time = Some("10 de Diciembre - 09:00 AM".to_string());

        let first = confirm(&mut history, &mut draft, &mut ids).unwrap();
        let second = confirm(&mut history, &mut draft, &mut ids).unwrap();
        assert_eq!(first, second);
        assert!(matches!(first, ReviewState::Conflicted { .. }));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn scheduler_resolves_conflict_by_changing_time() {
        let mut scheduler =
            AppointmentScheduler::new(History::seeded(), Box::new(SequentialIds::default()));
        *scheduler.draft_mut() = ready_draft("2024-12-11", "08:00 AM");
        scheduler.draft_mut().selected_date_time =
            Some("25 de Enero - 16:00 PM".to_string());

        scheduler.proceed_to_review().unwrap();
        let state = scheduler.confirm().unwrap();
        assert!(state.is_terminal());
        assert!(matches!(scheduler.state(), ReviewState::Conflicted { .. }));

        scheduler.resolve_conflict(ConflictResolution::ChangeTime);
        assert_eq!(scheduler.state(), &ReviewState::Reviewing);
        assert!(scheduler.draft().selected_date_time.is_none());
        assert_eq!(scheduler.draft().selected_doctor.as_deref(), Some("Ruiz, G."));

        select_time(scheduler.draft_mut(), "16:00 PM").unwrap();
        let state = scheduler.confirm().unwrap();
        assert_eq!(state, ReviewState::Confirmed { id: "apt-1".to_string() });
        assert_eq!(scheduler.history().len(), 3);
    }

    #[test]
    fn abandoning_resets_the_draft() {
        let mut scheduler =
            AppointmentScheduler::new(History::seeded(), Box::new(SequentialIds::default()));
        *scheduler.draft_mut() = ready_draft("2024-12-11", "08:00 AM");

        scheduler.resolve_conflict(ConflictResolution::Abandon);
        assert_eq!(scheduler.draft(), &AppointmentDraft::default());
        assert_eq!(scheduler.history().len(), 2);
    }
}
