//! Compatibility entry point for callers of the old single-factor rate.
//!
//! The older formula took only a timestamp. It now delegates to the canonical
//! model with a neutral overtime index, no industry, and no fluctuation.

use chrono::NaiveDateTime;

use crate::models::presence::compute_working_rate;

pub fn baseline_working_rate(at: NaiveDateTime) -> f64 {
    compute_working_rate(at, 1.0, None, false)
}
