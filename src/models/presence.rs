//! Temporal presence model: what fraction of a workforce is still on the clock.
//!
//! The model resolves calendar context first, then takes one of three paths:
//!
//! - holiday: flat, low baseline scaled by the overtime index
//! - weekend (no make-up workday): flat baseline, damped outside core hours
//! - workday: piecewise base curve plus additive adjustments
//!
//! Every path is pure and clamped to `[MIN_RATE, MAX_RATE]`. The optional
//! fluctuation term is derived from a 5-minute time bucket, so the same
//! timestamp always yields the same value.

use chrono::NaiveDateTime;

use crate::data::{CalendarContext, is_peak_day, lunch_minutes};
use crate::domain::{Industry, PresenceSample};
use crate::math::unit_interval;

pub const MIN_RATE: f64 = 0.01;
pub const MAX_RATE: f64 = 0.98;

/// Width of a fluctuation bucket, in seconds.
pub const FLUCTUATION_BUCKET_SECS: i64 = 300;
const FLUCTUATION_AMPLITUDE: f64 = 0.03;

const OFF_DAY_FACTOR: f64 = 0.15;
const HOLIDAY_CEILING: f64 = 0.20;
const WEEKEND_CEILING: f64 = 0.25;
const WEEKEND_OFF_HOURS_DAMPING: f64 = 0.5;

const PRE_WORK_RATE: f64 = 0.03;
const PLATEAU_RATE: f64 = 0.95;
const EVENING_START_RATE: f64 = 0.85;
const BASE_FLOOR: f64 = 0.02;

/// Evening decay segments as `(start_hour, end_hour, drop_per_hour)`.
///
/// The per-hour drop is divided by the overtime index.
const DECAY_SEGMENTS: [(f64, f64, f64); 3] = [(18.0, 19.0, 0.30), (19.0, 21.0, 0.15), (21.0, 24.0, 0.08)];

const PEAK_DAY_BONUS: f64 = 0.05;
const LUNCH_START_HOUR: f64 = 12.0;
const LUNCH_DIP_MIN: f64 = 0.05;
const LUNCH_DIP_SPAN: f64 = 0.10;

const OVERTIME_INDEX_MIN: f64 = 0.5;
const OVERTIME_INDEX_MAX: f64 = 2.0;
const EVENING_OVERTIME_GAIN: f64 = 0.4;

/// Modeled working rate at `at` (local wall-clock time of the population).
pub fn compute_working_rate(
    at: NaiveDateTime,
    overtime_index: f64,
    industry: Option<Industry>,
    include_fluctuation: bool,
) -> f64 {
    let ctx = CalendarContext::resolve(at);
    let oi = sanitize_overtime_index(overtime_index);

    if ctx.is_holiday {
        return clamp_rate((OFF_DAY_FACTOR * oi).clamp(MIN_RATE, HOLIDAY_CEILING));
    }

    if ctx.is_weekend() && !ctx.is_override_workday {
        let mut rate = (OFF_DAY_FACTOR * oi).clamp(MIN_RATE, WEEKEND_CEILING);
        if ctx.hour < 10 || ctx.hour >= 18 {
            rate *= WEEKEND_OFF_HOURS_DAMPING;
        }
        return clamp_rate(rate);
    }

    let mut rate = base_curve(ctx.fractional_hour, oi);
    rate += season_adjustment(ctx.month);
    rate += weekday_bias(ctx.weekday);
    if let Some(industry) = industry {
        rate += peak_day_bonus(industry, &ctx);
    }
    rate -= lunch_dip(ctx.fractional_hour, lunch_minutes(industry));
    if include_fluctuation {
        rate += fluctuation(time_bucket(at));
    }

    if ctx.hour >= 18 && oi > 1.0 {
        rate *= 1.0 + (oi - 1.0) * EVENING_OVERTIME_GAIN;
    }

    clamp_rate(rate)
}

/// Evaluate the model and keep the inputs alongside the result.
pub fn sample(
    at: NaiveDateTime,
    overtime_index: f64,
    industry: Option<Industry>,
    include_fluctuation: bool,
) -> PresenceSample {
    let ctx = CalendarContext::resolve(at);
    PresenceSample {
        timestamp: at,
        weekday: ctx.weekday,
        is_holiday: ctx.is_holiday,
        overtime_index: sanitize_overtime_index(overtime_index),
        industry,
        working_rate: compute_working_rate(at, overtime_index, industry, include_fluctuation),
    }
}

/// Working rate at the top of every hour of `at`'s date, without fluctuation.
pub fn hourly_curve(at: NaiveDateTime, overtime_index: f64, industry: Option<Industry>) -> [f64; 24] {
    let mut out = [0.0; 24];
    for (hour, slot) in out.iter_mut().enumerate() {
        if let Some(t) = at.date().and_hms_opt(hour as u32, 0, 0) {
            *slot = compute_working_rate(t, overtime_index, industry, false);
        }
    }
    out
}

/// Workday base curve for fractional hour `h`.
pub fn base_curve(h: f64, overtime_index: f64) -> f64 {
    if h < 8.0 {
        return PRE_WORK_RATE;
    }
    if h < 9.5 {
        return PRE_WORK_RATE + (PLATEAU_RATE - PRE_WORK_RATE) * (h - 8.0) / 1.5;
    }
    if h < 17.5 {
        return PLATEAU_RATE;
    }
    if h < 18.0 {
        return PLATEAU_RATE - (PLATEAU_RATE - EVENING_START_RATE) * (h - 17.5) / 0.5;
    }

    let mut rate = EVENING_START_RATE;
    for (start, end, drop_per_hour) in DECAY_SEGMENTS {
        if h <= start {
            break;
        }
        let span = h.min(end) - start;
        rate -= drop_per_hour / overtime_index * span;
    }
    rate.max(BASE_FLOOR)
}

/// Seasonal shift by month: year-end rush up, summer and post-festival down.
pub fn season_adjustment(month: u32) -> f64 {
    match month {
        11 | 12 | 1 => 0.03,
        7 | 8 => -0.03,
        2 => -0.02,
        _ => 0.0,
    }
}

/// Weekday bias, Monday = 1.
pub fn weekday_bias(weekday: u32) -> f64 {
    match weekday {
        1 => 0.02,
        2 => 0.01,
        5 => -0.03,
        6 | 7 => -0.05,
        _ => 0.0,
    }
}

fn peak_day_bonus(industry: Industry, ctx: &CalendarContext) -> f64 {
    if ctx.hour >= 18 && is_peak_day(industry, ctx.weekday) {
        PEAK_DAY_BONUS
    } else {
        0.0
    }
}

/// Dip during the lunch window: 0.05 at the edges, 0.15 at the midpoint.
pub fn lunch_dip(h: f64, lunch_minutes: u32) -> f64 {
    let duration = lunch_minutes as f64 / 60.0;
    if duration <= 0.0 || h < LUNCH_START_HOUR || h >= LUNCH_START_HOUR + duration {
        return 0.0;
    }
    let progress = (h - LUNCH_START_HOUR) / duration;
    LUNCH_DIP_MIN + LUNCH_DIP_SPAN * (1.0 - (2.0 * progress - 1.0).abs())
}

/// Bounded pseudo-random offset in `[-0.03, 0.03]` keyed by a time bucket.
pub fn fluctuation(time_bucket: i64) -> f64 {
    (unit_interval(time_bucket as u64) * 2.0 - 1.0) * FLUCTUATION_AMPLITUDE
}

/// 5-minute bucket index of a wall-clock instant.
pub fn time_bucket(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp().div_euclid(FLUCTUATION_BUCKET_SECS)
}

fn sanitize_overtime_index(oi: f64) -> f64 {
    if oi.is_finite() {
        oi.clamp(OVERTIME_INDEX_MIN, OVERTIME_INDEX_MAX)
    } else {
        1.0
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        MIN_RATE
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn golden_tuesday_evening() {
        // 2026-03-10 is a Tuesday in a neutral season month.
        let rate = compute_working_rate(at(2026, 3, 10, 21, 30), 1.35, None, false);
        assert!((0.35..=0.55).contains(&rate), "rate {rate}");
        assert!((rate - 0.439_955_555_6).abs() < 1e-6, "rate {rate}");
    }

    #[test]
    fn holiday_stays_low_all_day() {
        for hour in 0..24 {
            for oi in [0.5, 1.0, 1.4, 2.0, 5.0] {
                let rate = compute_working_rate(at(2026, 10, 1, hour, 0), oi, Some(Industry::Tech), true);
                assert!(rate <= 0.20, "hour {hour} oi {oi}: {rate}");
            }
        }
    }

    #[test]
    fn weekend_is_damped_outside_core_hours() {
        // 2026-03-14 is a Saturday.
        let core = compute_working_rate(at(2026, 3, 14, 14, 0), 1.0, None, false);
        let late = compute_working_rate(at(2026, 3, 14, 20, 0), 1.0, None, false);
        assert!((core - 0.15).abs() < 1e-12);
        assert!((late - 0.075).abs() < 1e-12);
    }

    #[test]
    fn makeup_workday_follows_workday_curve() {
        // 2026-02-28 is a Saturday make-up workday.
        let rate = compute_working_rate(at(2026, 2, 28, 11, 0), 1.0, None, false);
        assert!(rate > 0.8, "rate {rate}");
    }

    #[test]
    fn higher_overtime_index_decays_slower() {
        let t = at(2026, 3, 11, 20, 0);
        let low = compute_working_rate(t, 1.0, None, false);
        let high = compute_working_rate(t, 1.4, None, false);
        assert!(high > low, "low {low} high {high}");
    }

    #[test]
    fn base_curve_is_continuous_at_knots() {
        for knot in [8.0, 9.5, 17.5, 18.0, 19.0, 21.0] {
            let left = base_curve(knot - 1e-9, 1.0);
            let right = base_curve(knot, 1.0);
            assert!((left - right).abs() < 1e-6, "knot {knot}: {left} vs {right}");
        }
    }

    #[test]
    fn lunch_dip_peaks_mid_window() {
        assert!((lunch_dip(12.0, 60) - 0.05).abs() < 1e-12);
        assert!((lunch_dip(12.5, 60) - 0.15).abs() < 1e-12);
        assert_eq!(lunch_dip(13.0, 60), 0.0);
        assert_eq!(lunch_dip(11.9, 60), 0.0);
    }

    #[test]
    fn peak_day_adds_evening_bonus() {
        // Wednesday evening: peak for tech, not for finance.
        let t = at(2026, 3, 11, 19, 0);
        let tech = compute_working_rate(t, 1.0, Some(Industry::Tech), false);
        let finance = compute_working_rate(t, 1.0, Some(Industry::Finance), false);
        assert!((tech - finance - 0.05).abs() < 1e-12);
    }

    #[test]
    fn fluctuation_is_bounded_and_repeatable() {
        for bucket in -1_000i64..1_000 {
            let f = fluctuation(bucket);
            assert!((-0.03..=0.03).contains(&f));
            assert_eq!(f, fluctuation(bucket));
        }
    }

    #[test]
    fn same_bucket_same_fluctuation() {
        let a = at(2026, 3, 10, 15, 1);
        let b = at(2026, 3, 10, 15, 4);
        assert_eq!(time_bucket(a), time_bucket(b));
        assert_eq!(
            compute_working_rate(a, 1.2, None, true) - compute_working_rate(a, 1.2, None, false),
            compute_working_rate(b, 1.2, None, true) - compute_working_rate(b, 1.2, None, false),
        );
    }

    #[test]
    fn non_finite_overtime_index_is_neutral() {
        let t = at(2026, 3, 10, 21, 30);
        assert_eq!(
            compute_working_rate(t, f64::NAN, None, false),
            compute_working_rate(t, 1.0, None, false)
        );
    }

    #[test]
    fn sample_reports_context() {
        let s = sample(at(2026, 10, 1, 9, 0), 1.1, Some(Industry::Retail), false);
        assert!(s.is_holiday);
        assert_eq!(s.weekday, 4);
        assert!(s.working_rate <= 0.20);
    }

    #[test]
    fn hourly_curve_peaks_mid_morning() {
        let curve = hourly_curve(at(2026, 3, 10, 0, 0), 1.0, None);
        assert!(curve[10] > curve[3]);
        assert!(curve[10] > curve[23]);
    }
}
