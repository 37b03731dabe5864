//! Calendar view over the appointment history.
//!
//! Groups history entries by calendar day for a viewed month, builds the
//! month grid and splits entries into upcoming and past visits.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::error::BookingError;
use crate::history::History;
use crate::models::{AppointmentDraft, AppointmentType};

/// Markers drawn under a single day cell at most.
pub const MAX_DAY_MARKERS: usize = 3;

/// Entries listed in the "recent history" strip.
pub const OTHER_ENTRIES_LIMIT: usize = 3;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Column headers of the grid, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["D", "L", "M", "M", "J", "V", "S"];

fn first_of_month(month: u32, year: i32) -> Result<NaiveDate, BookingError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(BookingError::InvalidMonth(month))
}

/// Number of days in the given month.
pub fn days_in_month(month: u32, year: i32) -> Result<u32, BookingError> {
    let first = first_of_month(month, year)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let next = next.ok_or(BookingError::InvalidMonth(month))?;
    Ok((next - first).num_days() as u32)
}

/// Cells of a month view: blanks before the 1st, then every day.
///
/// Weeks start on Sunday. No cells from neighbouring months are added.
pub fn month_grid(month: u32, year: i32) -> Result<Vec<Option<u32>>, BookingError> {
    let leading = first_of_month(month, year)?.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(month, year)?;

    let mut grid = vec![None; leading];
    grid.extend((1..=days).map(Some));
    Ok(grid)
}

fn falls_on(entry: &AppointmentDraft, day: u32, month: u32, year: i32) -> bool {
    entry
        .tentative_date
        .is_some_and(|date| date.day() == day && date.month() == month && date.year() == year)
}

/// History entries dated exactly on the given day, in history order.
pub fn entries_on_day(
    history: &History,
    day: u32,
    month: u32,
    year: i32,
) -> Vec<&AppointmentDraft> {
    history
        .iter()
        .filter(|entry| falls_on(entry, day, month, year))
        .collect()
}

/// Marker types per day of the month, up to three per day.
///
/// Each marker carries the type of one entry, in history order.
pub fn day_markers(history: &History, month: u32, year: i32) -> BTreeMap<u32, Vec<AppointmentType>> {
    let mut markers: BTreeMap<u32, Vec<AppointmentType>> = BTreeMap::new();

    for entry in history {
        let Some(date) = entry.tentative_date else {
            continue;
        };
        if date.month() != month || date.year() != year {
            continue;
        }

        let day = markers.entry(date.day()).or_default();
        if day.len() < MAX_DAY_MARKERS {
            if let Some(appointment_type) = entry.appointment_type {
                day.push(appointment_type);
            }
        }
    }

    markers
}

/// Days of the month holding at least one entry.
pub fn days_with_entries(history: &History, month: u32, year: i32) -> BTreeSet<u32> {
    history
        .iter()
        .filter_map(|entry| entry.tentative_date)
        .filter(|date| date.month() == month && date.year() == year)
        .map(|date| date.day())
        .collect()
}

/// Entries on or after `today`, soonest first.
pub fn upcoming(history: &History, today: NaiveDate) -> Vec<&AppointmentDraft> {
    let mut entries: Vec<&AppointmentDraft> = history
        .iter()
        .filter(|entry| entry.tentative_date.is_some_and(|date| date >= today))
        .collect();
    entries.sort_by_key(|entry| entry.tentative_date);
    entries
}

/// Entries before `today`, most recent first.
pub fn past(history: &History, today: NaiveDate) -> Vec<&AppointmentDraft> {
    let mut entries: Vec<&AppointmentDraft> = history
        .iter()
        .filter(|entry| entry.tentative_date.is_some_and(|date| date < today))
        .collect();
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.tentative_date));
    entries
}

/// The month currently shown and the day picked in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    month: u32,
    year: i32,
    selected_day: u32,
}

impl CalendarView {
    /// Open the calendar on `date`, with that day selected.
    pub fn new(date: NaiveDate) -> Self {
        CalendarView {
            month: date.month(),
            year: date.year(),
            selected_day: date.day(),
        }
    }

    /// Open the calendar on day 1 of the given month.
    pub fn for_month(month: u32, year: i32) -> Result<Self, BookingError> {
        Ok(Self::new(first_of_month(month, year)?))
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn selected_day(&self) -> u32 {
        self.selected_day
    }

    pub fn select_day(&mut self, day: u32) -> Result<(), BookingError> {
        if NaiveDate::from_ymd_opt(self.year, self.month, day).is_none() {
            return Err(BookingError::InvalidDay {
                day,
                month: self.month,
                year: self.year,
            });
        }
        self.selected_day = day;
        Ok(())
    }

    pub fn previous_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
        self.selected_day = 1;
        info!("Calendar moved to {}", self.title());
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        self.selected_day = 1;
        info!("Calendar moved to {}", self.title());
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Header text, e.g. "Diciembre 2024".
    pub fn title(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Heading of the selected-day list, e.g. "Citas del 10 de Diciembre".
    pub fn day_heading(&self) -> String {
        format!("Citas del {} de {}", self.selected_day, self.month_name())
    }

    pub fn grid(&self) -> Vec<Option<u32>> {
        // month and year always form a valid month here
        month_grid(self.month, self.year).unwrap_or_default()
    }

    pub fn selected_entries<'a>(&self, history: &'a History) -> Vec<&'a AppointmentDraft> {
        entries_on_day(history, self.selected_day, self.month, self.year)
    }

    pub fn markers(&self, history: &History) -> BTreeMap<u32, Vec<AppointmentType>> {
        day_markers(history, self.month, self.year)
    }

    /// A few dated entries that fall outside the selected day.
    pub fn other_entries<'a>(&self, history: &'a History) -> Vec<&'a AppointmentDraft> {
        history
            .iter()
            .filter(|entry| {
                entry.tentative_date.is_some()
                    && !falls_on(entry, self.selected_day, self.month, self.year)
            })
            .take(OTHER_ENTRIES_LIMIT)
            .collect()
    }
}
