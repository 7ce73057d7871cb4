//! Property-based tests for the pure parts of the engine.
//!
//! Covered:
//! 1. Working-rate bounds, determinism, and the holiday ceiling
//! 2. Blend ratio and required synthetic count invariants
//! 3. Density factor bounds
//! 4. Geometry and weighted sampling

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use presence_engine::blend::{BlendConfig, PopulationBlendController};
use presence_engine::data::{HOLIDAYS, is_holiday};
use presence_engine::domain::{CityTier, GeoPoint, Industry};
use presence_engine::geo::density_factor;
use presence_engine::math::{EARTH_RADIUS_M, bounding_box, haversine_m, weighted_sample};
use presence_engine::models::{MAX_RATE, MIN_RATE, compute_working_rate};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
    // 2024-01-01 .. 2028-01-01
    (1_704_067_200i64..1_830_297_600).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    })
}

fn industry() -> impl Strategy<Value = Option<Industry>> {
    prop::option::of(prop::sample::select(Industry::ALL.to_vec()))
}

fn tier() -> impl Strategy<Value = CityTier> {
    prop::sample::select(vec![
        CityTier::Tier1,
        CityTier::NewTier1,
        CityTier::Tier2,
        CityTier::Tier3,
    ])
}

/// Point reached by travelling `distance_m` from `from` on initial `bearing_deg`.
fn destination(from: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let angular = distance_m / EARTH_RADIUS_M;
    let (lat1, lon1, theta) = (from.lat.to_radians(), from.lon.to_radians(), bearing_deg.to_radians());
    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());
    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_rate_within_bounds(
        at in timestamp(),
        oi in -5.0f64..5.0,
        industry in industry(),
        fluctuation in any::<bool>(),
    ) {
        let rate = compute_working_rate(at, oi, industry, fluctuation);
        prop_assert!((MIN_RATE..=MAX_RATE).contains(&rate), "rate {rate} at {at}");
    }

    #[test]
    fn prop_rate_is_deterministic(
        at in timestamp(),
        oi in 0.5f64..2.0,
        industry in industry(),
        fluctuation in any::<bool>(),
    ) {
        let a = compute_working_rate(at, oi, industry, fluctuation);
        let b = compute_working_rate(at, oi, industry, fluctuation);
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn prop_holidays_stay_under_ceiling(
        year in 2024i32..2028,
        holiday in prop::sample::select(HOLIDAYS.to_vec()),
        hour in 0u32..24,
        minute in 0u32..60,
        oi in 0.0f64..3.0,
        industry in industry(),
    ) {
        let (month, day) = holiday;
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        prop_assert!(is_holiday(date));
        let at = date.and_hms_opt(hour, minute, 0).unwrap();
        let rate = compute_working_rate(at, oi, industry, true);
        prop_assert!(rate <= 0.20, "holiday rate {rate} at {at}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_target_ratio_within_configured_bounds(authentic in any::<u64>()) {
        let controller = PopulationBlendController::new(BlendConfig::default()).unwrap();
        let ratio = controller.target_synthetic_ratio(authentic);
        prop_assert!((0.2..=0.9).contains(&ratio));
    }

    #[test]
    fn prop_target_ratio_is_monotone(a in 0u64..20_000, b in 0u64..20_000) {
        let controller = PopulationBlendController::new(BlendConfig::default()).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(controller.target_synthetic_ratio(lo) >= controller.target_synthetic_ratio(hi));
    }

    #[test]
    fn prop_required_count_never_overfills(
        authentic in 0usize..500,
        current in 0usize..500,
        total in 0usize..500,
    ) {
        let controller = PopulationBlendController::new(BlendConfig::default()).unwrap();
        let needed = controller.required_synthetic_count(authentic, current, total);
        if authentic <= total {
            prop_assert!(authentic + needed <= total);
        } else {
            prop_assert_eq!(needed, 0);
        }
    }

    #[test]
    fn prop_density_factor_bounded(tier in tier(), hour in any::<u32>(), weekend in any::<bool>()) {
        let factor = density_factor(tier, hour, weekend);
        prop_assert!((0.1..=1.0).contains(&factor));
    }

    #[test]
    fn prop_haversine_symmetric(
        lat1 in -89.0f64..89.0, lon1 in -179.0f64..179.0,
        lat2 in -89.0f64..89.0, lon2 in -179.0f64..179.0,
    ) {
        let a = GeoPoint::new(lat1, lon1);
        let b = GeoPoint::new(lat2, lon2);
        let ab = haversine_m(a, b);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - haversine_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn prop_bounding_box_contains_center(
        lat in -85.0f64..85.0,
        lon in -179.0f64..179.0,
        radius in 100.0f64..50_000.0,
    ) {
        let center = GeoPoint::new(lat, lon);
        prop_assert!(bounding_box(center, radius).contains(&center));
    }

    #[test]
    fn prop_bounding_box_covers_circle(
        lat in -80.0f64..80.0,
        lon in -170.0f64..170.0,
        radius in 1.0f64..50_000.0,
        bearing in 0.0f64..360.0,
        fraction in 0.0f64..=1.0,
    ) {
        let center = GeoPoint::new(lat, lon);
        let point = destination(center, bearing, radius * fraction);
        prop_assert!(haversine_m(center, point) <= radius + 1e-6);
        prop_assert!(bounding_box(center, radius).contains(&point), "{point:?} from {center:?}");
    }

    #[test]
    fn prop_single_weight_always_sampled(
        seed in any::<u64>(),
        heavy in 0usize..5,
        weight in 0.001f64..1_000.0,
    ) {
        let mut histogram: Vec<(usize, f64)> = (0..5).map(|k| (k, 0.0)).collect();
        histogram[heavy].1 = weight;
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            prop_assert_eq!(weighted_sample(&histogram, &mut rng), Some(&heavy));
        }
    }
}
