//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the engine components in-memory
//! - returned to the HTTP/API layer as plain structured values
//! - loaded from JSON fixtures by the in-memory store

use chrono::{NaiveDateTime, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::haversine_m;

/// Industry segment used to adjust the working-rate curve.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Tech,
    Finance,
    Manufacturing,
    Retail,
    Healthcare,
    Education,
    Government,
    Media,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 9] = [
        Industry::Tech,
        Industry::Finance,
        Industry::Manufacturing,
        Industry::Retail,
        Industry::Healthcare,
        Industry::Education,
        Industry::Government,
        Industry::Media,
        Industry::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Industry::Tech => "tech",
            Industry::Finance => "finance",
            Industry::Manufacturing => "manufacturing",
            Industry::Retail => "retail",
            Industry::Healthcare => "healthcare",
            Industry::Education => "education",
            Industry::Government => "government",
            Industry::Media => "media",
            Industry::Other => "other",
        }
    }

    /// Lenient parse used for free-text storage columns.
    ///
    /// Unknown labels map to [`Industry::Other`] rather than failing.
    pub fn from_label(raw: &str) -> Industry {
        let needle = raw.trim();
        Industry::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(needle))
            .unwrap_or(Industry::Other)
    }
}

/// City tier, which scales the density factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CityTier {
    Tier1,
    NewTier1,
    Tier2,
    Tier3,
}

impl CityTier {
    pub fn multiplier(self) -> f64 {
        match self {
            CityTier::Tier1 => 1.5,
            CityTier::NewTier1 => 1.2,
            CityTier::Tier2 => 1.0,
            CityTier::Tier3 => 0.8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CityTier::Tier1 => "tier-1",
            CityTier::NewTier1 => "new-tier-1",
            CityTier::Tier2 => "tier-2",
            CityTier::Tier3 => "tier-3",
        }
    }
}

/// Whether an entity is currently "on the clock".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Working,
    Off,
}

impl WorkStatus {
    pub fn label(self) -> &'static str {
        match self {
            WorkStatus::Working => "working",
            WorkStatus::Off => "off",
        }
    }
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_m(*self, *other)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Axis-aligned prefilter box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: &GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }
}

/// One evaluation of the temporal presence model. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceSample {
    pub timestamp: NaiveDateTime,
    /// ISO weekday, Monday = 1.
    pub weekday: u32,
    pub is_holiday: bool,
    pub overtime_index: f64,
    pub industry: Option<Industry>,
    pub working_rate: f64,
}

/// A record backed by a genuine user check-in. Owned by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticEntity {
    pub id: String,
    pub position: GeoPoint,
    pub last_activity: NaiveDateTime,
    pub category: String,
}

/// A request-scoped stand-in generated to fill sparse results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticEntity {
    pub transient_id: String,
    pub distance_m: f64,
    pub status: WorkStatus,
    pub implied_city: String,
    pub industry: Industry,
}

/// A row of a mixed nearby result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NearbyEntity {
    Authentic {
        entity: AuthenticEntity,
        distance_m: f64,
        status: WorkStatus,
    },
    Synthetic(SyntheticEntity),
}

impl NearbyEntity {
    pub fn id(&self) -> &str {
        match self {
            NearbyEntity::Authentic { entity, .. } => &entity.id,
            NearbyEntity::Synthetic(s) => &s.transient_id,
        }
    }

    pub fn distance_m(&self) -> f64 {
        match self {
            NearbyEntity::Authentic { distance_m, .. } => *distance_m,
            NearbyEntity::Synthetic(s) => s.distance_m,
        }
    }

    pub fn status(&self) -> WorkStatus {
        match self {
            NearbyEntity::Authentic { status, .. } => *status,
            NearbyEntity::Synthetic(s) => s.status,
        }
    }

    pub fn is_authentic(&self) -> bool {
        matches!(self, NearbyEntity::Authentic { .. })
    }
}

/// Parameters of a "who is nearby" request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub limit: usize,
    pub include_synthetic: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyResult {
    pub entities: Vec<NearbyEntity>,
    pub authentic_count: usize,
    pub synthetic_count: usize,
    pub estimated_area_total: u64,
}

/// A raw historical activity row read by the behavior profile learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub timestamp: NaiveDateTime,
    pub category: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub content_length: u32,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    /// Set on AI-generated or seeded rows; those never feed the profile.
    #[serde(default)]
    pub is_synthetic: bool,
}

/// Weighted histogram: `(key, weight)` pairs, heaviest first.
pub type Histogram<K> = Vec<(K, f64)>;

/// Scalar averages over the authentic activity window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub content_length: f64,
    pub likes: f64,
    pub comments: f64,
    pub posts_per_day: f64,
}

/// Empirical distributions learned from authentic behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorProfile {
    /// 24 buckets, one per hour of day.
    pub hour_histogram: Histogram<u32>,
    pub category_histogram: Histogram<String>,
    /// Capped at the configured top-N cities.
    pub city_histogram: Histogram<String>,
    pub industry_histogram: Histogram<Industry>,
    pub averages: AverageMetrics,
    /// Number of authentic rows the profile was built from.
    pub sample_size: usize,
    pub computed_at: NaiveDateTime,
    /// True when built entirely from hardcoded defaults.
    pub is_fallback: bool,
}

/// ISO weekday number, Monday = 1.
pub fn weekday_number(day: Weekday) -> u32 {
    day.number_from_monday()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industry_label_round_trips_loosely() {
        assert_eq!(Industry::from_label(" Tech "), Industry::Tech);
        assert_eq!(Industry::from_label("FINANCE"), Industry::Finance);
        assert_eq!(Industry::from_label("basket weaving"), Industry::Other);
    }

    #[test]
    fn bounding_box_contains_edges() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 11.0,
            min_lon: 20.0,
            max_lon: 21.0,
        };
        assert!(bbox.contains(&GeoPoint::new(10.0, 21.0)));
        assert!(!bbox.contains(&GeoPoint::new(9.999, 20.5)));
    }

    #[test]
    fn invalid_coordinates_are_detected() {
        assert!(GeoPoint::new(22.5, 114.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
