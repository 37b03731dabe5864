//! Prenatal appointment booking core.
//!
//! A booking moves through the schedule form (type, week, center, date),
//! slot selection (specialist, time) and review, where it is checked for
//! conflicts against the patient's history before being added to it. The
//! calendar module then presents that history month by month.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod history;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod validation;

pub use error::{BookingError, BookingStage, DateRejection};
pub use history::History;
pub use models::{AppointmentDraft, AppointmentType};
pub use scheduler::{AppointmentScheduler, ConflictResolution, ReviewState};
