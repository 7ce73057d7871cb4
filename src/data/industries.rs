//! Per-industry traits used by the temporal model and the fallback profile.

use chrono::Weekday;

use crate::domain::Industry;

/// Lunch-window length when the industry is unknown.
pub const DEFAULT_LUNCH_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustryTraits {
    /// Weekdays on which evening presence gets a bonus.
    pub peak_days: &'static [Weekday],
    pub lunch_minutes: u32,
    /// Prior share of the workforce, used when no authentic rows exist.
    pub default_weight: f64,
}

pub fn traits(industry: Industry) -> IndustryTraits {
    match industry {
        Industry::Tech => IndustryTraits {
            peak_days: &[Weekday::Mon, Weekday::Tue, Weekday::Wed],
            lunch_minutes: 90,
            default_weight: 0.22,
        },
        Industry::Finance => IndustryTraits {
            peak_days: &[Weekday::Thu, Weekday::Fri],
            lunch_minutes: 60,
            default_weight: 0.12,
        },
        Industry::Manufacturing => IndustryTraits {
            peak_days: &[Weekday::Wed, Weekday::Sat],
            lunch_minutes: 45,
            default_weight: 0.16,
        },
        Industry::Retail => IndustryTraits {
            peak_days: &[Weekday::Fri, Weekday::Sat, Weekday::Sun],
            lunch_minutes: 30,
            default_weight: 0.12,
        },
        Industry::Healthcare => IndustryTraits {
            peak_days: &[Weekday::Mon],
            lunch_minutes: 30,
            default_weight: 0.08,
        },
        Industry::Education => IndustryTraits {
            peak_days: &[Weekday::Thu],
            lunch_minutes: 90,
            default_weight: 0.07,
        },
        Industry::Government => IndustryTraits {
            peak_days: &[],
            lunch_minutes: 120,
            default_weight: 0.06,
        },
        Industry::Media => IndustryTraits {
            peak_days: &[Weekday::Tue, Weekday::Thu],
            lunch_minutes: 90,
            default_weight: 0.07,
        },
        Industry::Other => IndustryTraits {
            peak_days: &[],
            lunch_minutes: DEFAULT_LUNCH_MINUTES,
            default_weight: 0.10,
        },
    }
}

pub fn lunch_minutes(industry: Option<Industry>) -> u32 {
    industry.map_or(DEFAULT_LUNCH_MINUTES, |i| traits(i).lunch_minutes)
}

/// Whether `weekday` (Monday = 1) is a peak day for `industry`.
pub fn is_peak_day(industry: Industry, weekday: u32) -> bool {
    traits(industry)
        .peak_days
        .iter()
        .any(|d| d.number_from_monday() == weekday)
}
