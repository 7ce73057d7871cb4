//! Weighted draws over learned histograms and the center-biased distance draw.

use rand::Rng;
use rand::distributions::Distribution;
use rand_distr::Beta;

use crate::error::AppError;

/// Draw a key proportionally to its weight.
///
/// - negative or non-finite weights count as zero
/// - if every weight is zero, fall back to a uniform choice over the keys
/// - returns `None` only when the histogram has no keys at all
pub fn weighted_sample<'a, K, R>(histogram: &'a [(K, f64)], rng: &mut R) -> Option<&'a K>
where
    R: Rng + ?Sized,
{
    if histogram.is_empty() {
        return None;
    }

    let total: f64 = histogram.iter().map(|(_, w)| sanitize_weight(*w)).sum();
    if !(total.is_finite() && total > 0.0) {
        let idx = rng.gen_range(0..histogram.len());
        return histogram.get(idx).map(|(k, _)| k);
    }

    let mut target = rng.gen_range(0.0..total);
    let mut last_positive = None;
    for (key, weight) in histogram {
        let w = sanitize_weight(*weight);
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return Some(key);
        }
        target -= w;
        last_positive = Some(key);
    }

    // Floating-point residue can leave `target` marginally above the last bucket.
    last_positive
}

fn sanitize_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Samples distances in `[0, radius]` biased toward the center.
///
/// Distances follow `radius × Beta(1, 2)`, i.e. density `2(1 - d/r)/r`, which is
/// the same as `r × (1 - sqrt(1 - u))` for uniform `u`.
#[derive(Debug, Clone)]
pub struct DistanceSampler {
    radius_m: f64,
    shape: Beta<f64>,
}

impl DistanceSampler {
    pub fn new(radius_m: f64) -> Result<Self, AppError> {
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(AppError::invalid_input(format!(
                "Distance sampler radius must be finite and > 0, got {radius_m}."
            )));
        }
        let shape = Beta::new(1.0, 2.0)
            .map_err(|e| AppError::configuration(format!("Distance distribution error: {e}")))?;
        Ok(Self { radius_m, shape })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (self.shape.sample(rng) * self.radius_m).clamp(0.0, self.radius_m)
    }
}
