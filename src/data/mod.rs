//! Immutable lookup tables: calendar, cities, industries.
//!
//! Everything here is `const` data, built at compile time and never per call.

pub mod calendar;
pub mod cities;
pub mod industries;

pub use calendar::{CalendarContext, HOLIDAYS, WORKDAY_OVERRIDES, is_holiday, is_override_workday};
pub use cities::{CITIES, CITY_MATCH_RADIUS_M, City, find_city, nearest_city, resolve_city};
pub use industries::{IndustryTraits, is_peak_day, lunch_minutes, traits};
