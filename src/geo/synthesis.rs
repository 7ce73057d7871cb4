//! Nearby queries over a mix of authentic and synthetic entities.
//!
//! Workflow per request:
//!
//! 1. clamp radius/limit, prefilter storage with a bounding box (one bounded
//!    over-fetch), then apply the exact Haversine filter
//! 2. if the authentic set is short of `limit`, top up with synthetic entities
//!    shaped by the behavior profile and the temporal model
//! 3. merge, sort by distance, cap at `limit`

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use tracing::debug;

use crate::blend::PopulationBlendController;
use crate::config::GeoConfig;
use crate::data::{CalendarContext, find_city, resolve_city};
use crate::domain::{
    AuthenticEntity, BehaviorProfile, CityTier, GeoPoint, Industry, NearbyEntity, NearbyQuery,
    NearbyResult, SyntheticEntity, WorkStatus,
};
use crate::error::AppError;
use crate::geo::density::{density_factor, estimated_area_total};
use crate::math::{DistanceSampler, bounding_box, hash_pair, weighted_sample};
use crate::models::{compute_working_rate, time_bucket};
use crate::store::PresenceStore;

const UNKNOWN_CITY: &str = "unknown";

#[derive(Debug, Clone)]
pub struct GeospatialSynthesis {
    config: GeoConfig,
}

impl GeospatialSynthesis {
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Any finite positive radius is kept, capped at `max_radius_m`.
    /// Non-finite or non-positive input becomes `min_radius_m`.
    pub fn clamp_radius(&self, radius_m: f64) -> f64 {
        if radius_m.is_finite() && radius_m > 0.0 {
            radius_m.min(self.config.max_radius_m)
        } else {
            self.config.min_radius_m
        }
    }

    pub fn clamp_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.config.max_limit)
    }

    pub fn nearby<S, R>(
        &self,
        store: &S,
        blend: &PopulationBlendController,
        profile: &BehaviorProfile,
        query: &NearbyQuery,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<NearbyResult, AppError>
    where
        S: PresenceStore + ?Sized,
        R: Rng + ?Sized,
    {
        let center = clamp_point(query.center);
        let radius = self.clamp_radius(query.radius_meters);
        let limit = self.clamp_limit(query.limit);

        let mut entities = self.authentic_nearby(store, center, radius, limit, now)?;
        let in_range = entities.len();

        if in_range < limit && query.include_synthetic {
            let needed = blend.required_synthetic_count(in_range, 0, limit);
            if needed > 0 {
                let synthetic = self.generate_synthetic(center, radius, needed, profile, now, rng)?;
                debug!(in_range, needed, radius, "topped up nearby result with synthetic entities");
                entities.extend(synthetic.into_iter().map(NearbyEntity::Synthetic));
                sort_by_distance(&mut entities);
                entities.truncate(limit);
            }
        }

        let authentic_count = entities.iter().filter(|e| e.is_authentic()).count();
        let synthetic_count = entities.len() - authentic_count;

        Ok(NearbyResult {
            entities,
            authentic_count,
            synthetic_count,
            estimated_area_total: self.estimated_area_total(center, radius),
        })
    }

    /// Authentic entities within `radius`, nearest first, at most `limit`.
    fn authentic_nearby<S>(
        &self,
        store: &S,
        center: GeoPoint,
        radius: f64,
        limit: usize,
        now: NaiveDateTime,
    ) -> Result<Vec<NearbyEntity>, AppError>
    where
        S: PresenceStore + ?Sized,
    {
        let bbox = bounding_box(center, radius);
        let fetch_limit = limit.saturating_mul(self.config.over_fetch_factor);
        let candidates = store.query_by_bounding_box(&bbox, true, fetch_limit)?;

        let active_since = Duration::try_minutes(self.config.active_window_minutes)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(NaiveDateTime::MIN);
        let mut out: Vec<NearbyEntity> = candidates
            .into_iter()
            .filter_map(|entity| {
                let distance_m = center.distance_to(&entity.position);
                (distance_m <= radius).then(|| authentic_entry(entity, distance_m, active_since))
            })
            .collect();

        sort_by_distance(&mut out);
        out.truncate(limit);
        Ok(out)
    }

    fn generate_synthetic<R>(
        &self,
        center: GeoPoint,
        radius: f64,
        count: usize,
        profile: &BehaviorProfile,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Vec<SyntheticEntity>, AppError>
    where
        R: Rng + ?Sized,
    {
        let sampler = DistanceSampler::new(radius)?;
        let resolved = resolve_city(center);
        let id_seed = stable_seed(center, now);

        let mut out = Vec::with_capacity(count);
        for index in 0..count {
            let implied_city = match resolved {
                Some(city) => city.name.to_string(),
                None => weighted_sample(&profile.city_histogram, rng)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_CITY.to_string()),
            };
            let overtime_index = find_city(&implied_city).map_or(1.0, |c| c.overtime_index);
            let industry = weighted_sample(&profile.industry_histogram, rng)
                .copied()
                .unwrap_or(Industry::Other);

            let rate = compute_working_rate(now, overtime_index, Some(industry), true);
            let status = if rng.r#gen::<f64>() < rate {
                WorkStatus::Working
            } else {
                WorkStatus::Off
            };

            let transient_id = if self.config.stable_synthetic_ids {
                format!("syn-{:016x}", hash_pair(id_seed, index as u64))
            } else {
                format!("syn-{:016x}", rng.r#gen::<u64>())
            };

            out.push(SyntheticEntity {
                transient_id,
                distance_m: sampler.sample(rng),
                status,
                implied_city,
                industry,
            });
        }
        Ok(out)
    }

    pub fn estimated_area_total(&self, center: GeoPoint, radius_m: f64) -> u64 {
        estimated_area_total(
            clamp_point(center),
            self.clamp_radius(radius_m),
            self.config.flat_density_per_km2,
        )
    }

    /// Headline "still working around you" figure: area workforce scaled by
    /// the density factor and the working rate at `now`.
    pub fn estimate_active_nearby(&self, center: GeoPoint, radius_m: f64, now: NaiveDateTime) -> u64 {
        let center = clamp_point(center);
        let total = self.estimated_area_total(center, radius_m);
        let city = resolve_city(center);
        let tier = city.map_or(CityTier::Tier2, |c| c.tier);
        let overtime_index = city.map_or(1.0, |c| c.overtime_index);

        let ctx = CalendarContext::resolve(now);
        let factor = density_factor(tier, ctx.hour, !ctx.is_workday());
        let rate = compute_working_rate(now, overtime_index, None, false);
        (total as f64 * factor * rate).round() as u64
    }
}

fn authentic_entry(entity: AuthenticEntity, distance_m: f64, active_since: NaiveDateTime) -> NearbyEntity {
    let status = if entity.last_activity >= active_since {
        WorkStatus::Working
    } else {
        WorkStatus::Off
    };
    NearbyEntity::Authentic {
        entity,
        distance_m,
        status,
    }
}

fn sort_by_distance(entities: &mut [NearbyEntity]) {
    entities.sort_by(|a, b| a.distance_m().total_cmp(&b.distance_m()));
}

fn clamp_point(p: GeoPoint) -> GeoPoint {
    GeoPoint::new(p.lat.clamp(-90.0, 90.0), p.lon.clamp(-180.0, 180.0))
}

/// Seed for stable synthetic ids: center at ~10 m resolution plus the
/// 5-minute time bucket.
fn stable_seed(center: GeoPoint, now: NaiveDateTime) -> u64 {
    let lat_key = (center.lat * 1e4).round() as i64 as u64;
    let lon_key = (center.lon * 1e4).round() as i64 as u64;
    hash_pair(hash_pair(lat_key, lon_key), time_bucket(now) as u64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::blend::BlendConfig;
    use crate::store::MemoryStore;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap()
    }

    fn shenzhen() -> GeoPoint {
        GeoPoint::new(22.5431, 114.0579)
    }

    fn entity(id: &str, lat: f64, lon: f64, minutes_ago: i64) -> AuthenticEntity {
        AuthenticEntity {
            id: id.to_string(),
            position: GeoPoint::new(lat, lon),
            last_activity: now() - Duration::minutes(minutes_ago),
            category: "overtime".to_string(),
        }
    }

    fn fixtures() -> (GeospatialSynthesis, PopulationBlendController, BehaviorProfile) {
        (
            GeospatialSynthesis::new(GeoConfig::default()),
            PopulationBlendController::new(BlendConfig::default()).unwrap(),
            BehaviorProfile::fallback(now(), 20),
        )
    }

    fn query(limit: usize, include_synthetic: bool) -> NearbyQuery {
        NearbyQuery {
            center: shenzhen(),
            radius_meters: 1_000.0,
            limit,
            include_synthetic,
        }
    }

    #[test]
    fn empty_store_without_synthetic_is_empty() {
        let (geo, blend, profile) = fixtures();
        let mut rng = StdRng::seed_from_u64(1);
        let result = geo
            .nearby(&MemoryStore::default(), &blend, &profile, &query(20, false), now(), &mut rng)
            .unwrap();
        assert!(result.entities.is_empty());
        assert_eq!(result.authentic_count, 0);
        assert_eq!(result.synthetic_count, 0);
        assert!(result.estimated_area_total > 0);
    }

    #[test]
    fn exact_radius_filter_drops_bbox_corners() {
        let (geo, blend, profile) = fixtures();
        let mut store = MemoryStore::default();
        store.push_authentic(entity("near", 22.5440, 114.0579, 10));
        // Inside the bounding box corner but ~1.3 km away.
        store.push_authentic(entity("corner", 22.5515, 114.0668, 10));

        let mut rng = StdRng::seed_from_u64(2);
        let result = geo
            .nearby(&store, &blend, &profile, &query(20, false), now(), &mut rng)
            .unwrap();
        let ids: Vec<&str> = result.entities.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["near"]);
    }

    #[test]
    fn cold_start_tops_up_and_sorts() {
        let (geo, blend, profile) = fixtures();
        let mut store = MemoryStore::default();
        store.push_authentic(entity("a", 22.5435, 114.0579, 10));
        store.push_authentic(entity("b", 22.5460, 114.0579, 600));

        let mut rng = StdRng::seed_from_u64(3);
        let result = geo
            .nearby(&store, &blend, &profile, &query(20, true), now(), &mut rng)
            .unwrap();

        assert_eq!(result.authentic_count, 2);
        // floor(20 × 0.9) = 18, capped at 20 − 2.
        assert_eq!(result.synthetic_count, 18);
        assert_eq!(result.entities.len(), 20);
        assert!(result
            .entities
            .windows(2)
            .all(|w| w[0].distance_m() <= w[1].distance_m()));
        assert!(result.entities.iter().all(|e| e.distance_m() <= 1_000.0));

        let status_of = |id: &str| result.entities.iter().find(|e| e.id() == id).map(|e| e.status());
        assert_eq!(status_of("a"), Some(WorkStatus::Working));
        assert_eq!(status_of("b"), Some(WorkStatus::Off));
    }

    #[test]
    fn synthetic_entities_resolve_city() {
        let (geo, blend, profile) = fixtures();
        let mut rng = StdRng::seed_from_u64(4);
        let result = geo
            .nearby(&MemoryStore::default(), &blend, &profile, &query(10, true), now(), &mut rng)
            .unwrap();
        assert_eq!(result.synthetic_count, 9);
        for e in &result.entities {
            match e {
                NearbyEntity::Synthetic(s) => assert_eq!(s.implied_city, "Shenzhen"),
                NearbyEntity::Authentic { .. } => panic!("store is empty"),
            }
        }
    }

    #[test]
    fn remote_center_samples_city_from_profile() {
        let (geo, blend, mut profile) = fixtures();
        profile.city_histogram = vec![("Chengdu".to_string(), 1.0), ("Wuhan".to_string(), 0.0)];
        let q = NearbyQuery {
            center: GeoPoint::new(10.0, -150.0),
            ..query(10, true)
        };
        let mut rng = StdRng::seed_from_u64(5);
        let result = geo.nearby(&MemoryStore::default(), &blend, &profile, &q, now(), &mut rng).unwrap();
        assert!(!result.entities.is_empty());
        for e in &result.entities {
            if let NearbyEntity::Synthetic(s) = e {
                assert_eq!(s.implied_city, "Chengdu");
            }
        }
    }

    #[test]
    fn stable_ids_repeat_across_calls() {
        let config = GeoConfig {
            stable_synthetic_ids: true,
            ..GeoConfig::default()
        };
        let geo = GeospatialSynthesis::new(config);
        let (_, blend, profile) = fixtures();

        let ids = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ids: Vec<String> = geo
                .nearby(&MemoryStore::default(), &blend, &profile, &query(10, true), now(), &mut rng)
                .unwrap()
                .entities
                .iter()
                .map(|e| e.id().to_string())
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(10), ids(11));
    }

    #[test]
    fn radius_and_limit_are_clamped() {
        let (geo, _, _) = fixtures();
        assert_eq!(geo.clamp_radius(-5.0), 100.0);
        assert_eq!(geo.clamp_radius(f64::INFINITY), 100.0);
        assert_eq!(geo.clamp_radius(1e9), 50_000.0);
        assert_eq!(geo.clamp_radius(50.0), 50.0);
        assert_eq!(geo.clamp_radius(0.5), 0.5);
        assert_eq!(geo.clamp_limit(0), 1);
        assert_eq!(geo.clamp_limit(10_000), 200);
    }

    #[test]
    fn small_radius_is_honored() {
        let (geo, blend, profile) = fixtures();
        let mut store = MemoryStore::default();
        store.push_authentic(entity("inside", 22.5434, 114.0579, 10));
        // ~80 m north of the center.
        store.push_authentic(entity("outside", 22.54382, 114.0579, 10));

        let q = NearbyQuery {
            radius_meters: 50.0,
            ..query(20, true)
        };
        let mut rng = StdRng::seed_from_u64(6);
        let result = geo.nearby(&store, &blend, &profile, &q, now(), &mut rng).unwrap();

        assert_eq!(result.authentic_count, 1);
        assert!(result.entities.iter().all(|e| e.distance_m() <= 50.0));
        assert!(result.entities.iter().all(|e| e.id() != "outside"));
    }

    #[test]
    fn huge_active_window_marks_everyone_working() {
        let config = GeoConfig {
            active_window_minutes: i64::MAX,
            ..GeoConfig::default()
        };
        let geo = GeospatialSynthesis::new(config);
        let (_, blend, profile) = fixtures();
        let mut store = MemoryStore::default();
        store.push_authentic(entity("old", 22.5435, 114.0579, 60 * 24 * 365));

        let mut rng = StdRng::seed_from_u64(8);
        let result = geo
            .nearby(&store, &blend, &profile, &query(5, false), now(), &mut rng)
            .unwrap();
        assert_eq!(result.entities[0].status(), WorkStatus::Working);
    }

    #[test]
    fn active_estimate_is_bounded_by_area_total() {
        let (geo, _, _) = fixtures();
        let total = geo.estimated_area_total(shenzhen(), 1_000.0);
        let active = geo.estimate_active_nearby(shenzhen(), 1_000.0, now());
        assert!(active > 0);
        assert!(active <= total);
    }
}
