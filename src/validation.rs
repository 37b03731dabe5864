//! Date validation for the schedule form.
//!
//! Centers do not attend on weekends or on the fixed national holidays
//! listed below. Dates are plain calendar dates; no timezone is involved.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, warn};

use crate::error::DateRejection;

/// Fixed national holidays as (month, day).
pub const HOLIDAYS: [(u32, u32); 13] = [
    (1, 1),   // Año Nuevo
    (5, 1),   // Día del Trabajo
    (6, 7),   // Día de la Bandera
    (6, 29),  // San Pedro y San Pablo
    (7, 28),  // Independencia
    (7, 29),  // Independencia
    (8, 6),   // Batalla de Junín
    (8, 30),  // Santa Rosa de Lima
    (10, 8),  // Combate de Angamos
    (11, 1),  // Todos los Santos
    (12, 8),  // Inmaculada Concepción
    (12, 9),  // Batalla de Ayacucho
    (12, 25), // Navidad
];

pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS.contains(&(date.month(), date.day()))
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse an ISO `YYYY-MM-DD` date and check that it is a working day.
pub fn validate_date(date_str: &str) -> Result<NaiveDate, DateRejection> {
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| DateRejection::InvalidFormat(date_str.to_string()))?;

    check_working_day(date)?;

    debug!("Accepted tentative date {}", date);
    Ok(date)
}

/// Reject holidays first, then weekends.
pub fn check_working_day(date: NaiveDate) -> Result<(), DateRejection> {
    if is_holiday(date) {
        warn!("Rejected {}: national holiday", date);
        return Err(DateRejection::Holiday);
    }
    if is_weekend(date) {
        warn!("Rejected {}: weekend", date);
        return Err(DateRejection::Weekend);
    }
    Ok(())
}
