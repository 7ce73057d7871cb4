//! Area population estimates and the time-of-day density factor.

use crate::data::resolve_city;
use crate::domain::{CityTier, GeoPoint};
use crate::math::circle_area_km2;

/// Share of residents assumed to be in the workforce.
pub const LABOR_PARTICIPATION: f64 = 0.5;

const WEEKEND_DAMPENER: f64 = 0.3;
const DENSITY_FACTOR_MIN: f64 = 0.1;
const DENSITY_FACTOR_MAX: f64 = 1.0;

/// Time-of-day band multiplier. `hour` is taken modulo 24.
pub fn hour_band(hour: u32) -> f64 {
    match hour % 24 {
        0..=6 => 0.1,
        7..=8 => 0.5,
        9..=11 => 0.9,
        12..=13 => 0.7,
        14..=17 => 1.0,
        18..=20 => 0.6,
        _ => 0.3,
    }
}

/// Multiplier turning a raw nearby estimate into a plausible live count.
pub fn density_factor(tier: CityTier, hour: u32, is_weekend: bool) -> f64 {
    let weekend = if is_weekend { WEEKEND_DAMPENER } else { 1.0 };
    (tier.multiplier() * hour_band(hour) * weekend).clamp(DENSITY_FACTOR_MIN, DENSITY_FACTOR_MAX)
}

/// Working-age residents inside the circle.
///
/// Uses the nearest configured city's density, or `flat_density_per_km2`
/// when no city lies within the match radius.
pub fn estimated_area_total(center: GeoPoint, radius_m: f64, flat_density_per_km2: f64) -> u64 {
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return 0;
    }
    let density = resolve_city(center).map_or(flat_density_per_km2, |c| c.population_density);
    let estimate = circle_area_km2(radius_m) * density * LABOR_PARTICIPATION;
    if estimate.is_finite() && estimate > 0.0 {
        estimate.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_factor_table() {
        // Tier 1 afternoon saturates at the ceiling.
        assert_eq!(density_factor(CityTier::Tier1, 15, false), 1.0);
        assert!((density_factor(CityTier::Tier1, 10, false) - 1.0).abs() < 1e-12);
        assert!((density_factor(CityTier::Tier2, 10, false) - 0.9).abs() < 1e-12);
        assert!((density_factor(CityTier::Tier3, 19, false) - 0.48).abs() < 1e-12);
        assert!((density_factor(CityTier::NewTier1, 12, true) - 0.252).abs() < 1e-12);
        // Night floor.
        assert_eq!(density_factor(CityTier::Tier3, 3, true), 0.1);
    }

    #[test]
    fn density_factor_always_in_bounds() {
        for tier in [CityTier::Tier1, CityTier::NewTier1, CityTier::Tier2, CityTier::Tier3] {
            for hour in 0..48 {
                for weekend in [false, true] {
                    let f = density_factor(tier, hour, weekend);
                    assert!((0.1..=1.0).contains(&f));
                }
            }
        }
    }

    #[test]
    fn hour_wraps_past_midnight() {
        assert_eq!(hour_band(25), hour_band(1));
    }

    #[test]
    fn city_estimate_uses_city_density() {
        // Shenzhen: π × 1 km² × 8800 × 0.5 ≈ 13 823
        let total = estimated_area_total(GeoPoint::new(22.5431, 114.0579), 1_000.0, 500.0);
        assert_eq!(total, 13_823);
    }

    #[test]
    fn remote_estimate_uses_flat_density() {
        // π × 4 km² × 500 × 0.5 ≈ 3 142
        let total = estimated_area_total(GeoPoint::new(10.0, -150.0), 2_000.0, 500.0);
        assert_eq!(total, 3_142);
    }

    #[test]
    fn degenerate_radius_estimates_zero() {
        assert_eq!(estimated_area_total(GeoPoint::new(22.5, 114.0), 0.0, 500.0), 0);
        assert_eq!(estimated_area_total(GeoPoint::new(22.5, 114.0), f64::NAN, 500.0), 0);
    }
}
