//! Public-holiday calendar and swapped (make-up) workdays.
//!
//! Holidays are keyed by `(month, day)` and recur every year. Make-up workdays
//! are weekend dates that become official workdays when a holiday is bridged,
//! so they are year-specific.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::domain::weekday_number;

/// Fixed-date public holidays as `(month, day)`.
pub const HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),
    (4, 4),
    (4, 5),
    (5, 1),
    (5, 2),
    (5, 3),
    (5, 4),
    (5, 5),
    (10, 1),
    (10, 2),
    (10, 3),
    (10, 4),
    (10, 5),
    (10, 6),
    (10, 7),
];

/// Weekend dates that are official workdays, as `(year, month, day)`.
pub const WORKDAY_OVERRIDES: &[(i32, u32, u32)] = &[
    (2025, 1, 26),
    (2025, 2, 8),
    (2025, 4, 27),
    (2025, 9, 28),
    (2025, 10, 11),
    (2026, 1, 4),
    (2026, 2, 14),
    (2026, 2, 28),
    (2026, 5, 9),
    (2026, 9, 20),
    (2026, 10, 10),
];

pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS.contains(&(date.month(), date.day()))
}

pub fn is_override_workday(date: NaiveDate) -> bool {
    WORKDAY_OVERRIDES.contains(&(date.year(), date.month(), date.day()))
}

/// Calendar facts resolved for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarContext {
    /// ISO weekday, Monday = 1.
    pub weekday: u32,
    pub month: u32,
    pub hour: u32,
    /// Hour of day including minutes and seconds, in `[0, 24)`.
    pub fractional_hour: f64,
    pub is_holiday: bool,
    pub is_override_workday: bool,
}

impl CalendarContext {
    pub fn resolve(at: NaiveDateTime) -> Self {
        let date = at.date();
        let fractional_hour =
            at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0;
        Self {
            weekday: weekday_number(date.weekday()),
            month: date.month(),
            hour: at.hour(),
            fractional_hour,
            is_holiday: is_holiday(date),
            is_override_workday: is_override_workday(date),
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.weekday >= 6
    }

    /// A regular weekday or a make-up workday, and not a holiday.
    pub fn is_workday(&self) -> bool {
        !self.is_holiday && (!self.is_weekend() || self.is_override_workday)
    }
}
