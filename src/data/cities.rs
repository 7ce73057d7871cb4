//! Static city table: location, tier, overtime index, and urban density.

use crate::domain::{CityTier, GeoPoint};

/// Farthest a query point may be from a city center and still resolve to it.
pub const CITY_MATCH_RADIUS_M: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub tier: CityTier,
    /// 1.0 = baseline; higher means the workforce stays later.
    pub overtime_index: f64,
    /// Residents per square kilometer in the urban core.
    pub population_density: f64,
}

impl City {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

pub const CITIES: &[City] = &[
    City { name: "Beijing", lat: 39.9042, lon: 116.4074, tier: CityTier::Tier1, overtime_index: 1.35, population_density: 1_300.0 },
    City { name: "Shanghai", lat: 31.2304, lon: 121.4737, tier: CityTier::Tier1, overtime_index: 1.30, population_density: 3_900.0 },
    City { name: "Shenzhen", lat: 22.5431, lon: 114.0579, tier: CityTier::Tier1, overtime_index: 1.40, population_density: 8_800.0 },
    City { name: "Guangzhou", lat: 23.1291, lon: 113.2644, tier: CityTier::Tier1, overtime_index: 1.20, population_density: 2_500.0 },
    City { name: "Hangzhou", lat: 30.2741, lon: 120.1551, tier: CityTier::NewTier1, overtime_index: 1.30, population_density: 730.0 },
    City { name: "Chengdu", lat: 30.5728, lon: 104.0668, tier: CityTier::NewTier1, overtime_index: 1.05, population_density: 1_500.0 },
    City { name: "Wuhan", lat: 30.5928, lon: 114.3055, tier: CityTier::NewTier1, overtime_index: 1.10, population_density: 1_600.0 },
    City { name: "Nanjing", lat: 32.0603, lon: 118.7969, tier: CityTier::NewTier1, overtime_index: 1.15, population_density: 1_400.0 },
    City { name: "Xi'an", lat: 34.3416, lon: 108.9398, tier: CityTier::NewTier1, overtime_index: 1.05, population_density: 1_300.0 },
    City { name: "Suzhou", lat: 31.2989, lon: 120.5853, tier: CityTier::NewTier1, overtime_index: 1.20, population_density: 1_500.0 },
    City { name: "Tianjin", lat: 39.3434, lon: 117.3616, tier: CityTier::NewTier1, overtime_index: 1.05, population_density: 1_150.0 },
    City { name: "Chongqing", lat: 29.4316, lon: 106.9123, tier: CityTier::NewTier1, overtime_index: 1.00, population_density: 390.0 },
    City { name: "Changsha", lat: 28.2282, lon: 112.9388, tier: CityTier::NewTier1, overtime_index: 1.05, population_density: 870.0 },
    City { name: "Zhengzhou", lat: 34.7466, lon: 113.6253, tier: CityTier::NewTier1, overtime_index: 1.00, population_density: 1_700.0 },
    City { name: "Dongguan", lat: 23.0207, lon: 113.7518, tier: CityTier::NewTier1, overtime_index: 1.25, population_density: 4_300.0 },
    City { name: "Qingdao", lat: 36.0671, lon: 120.3826, tier: CityTier::Tier2, overtime_index: 1.00, population_density: 900.0 },
    City { name: "Xiamen", lat: 24.4798, lon: 118.0894, tier: CityTier::Tier2, overtime_index: 1.05, population_density: 3_100.0 },
    City { name: "Hefei", lat: 31.8206, lon: 117.2272, tier: CityTier::Tier2, overtime_index: 1.05, population_density: 850.0 },
    City { name: "Kunming", lat: 25.0389, lon: 102.7183, tier: CityTier::Tier2, overtime_index: 0.90, population_density: 400.0 },
    City { name: "Dalian", lat: 38.9140, lon: 121.6147, tier: CityTier::Tier2, overtime_index: 0.95, population_density: 590.0 },
    City { name: "Harbin", lat: 45.8038, lon: 126.5350, tier: CityTier::Tier3, overtime_index: 0.90, population_density: 190.0 },
    City { name: "Lanzhou", lat: 36.0611, lon: 103.8343, tier: CityTier::Tier3, overtime_index: 0.85, population_density: 340.0 },
];

/// Nearest configured city and its distance in meters.
pub fn nearest_city(point: GeoPoint) -> Option<(&'static City, f64)> {
    CITIES
        .iter()
        .map(|c| (c, c.position().distance_to(&point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Nearest city within [`CITY_MATCH_RADIUS_M`], if any.
pub fn resolve_city(point: GeoPoint) -> Option<&'static City> {
    nearest_city(point)
        .filter(|(_, d)| *d <= CITY_MATCH_RADIUS_M)
        .map(|(c, _)| c)
}

/// Case-insensitive lookup by city name.
pub fn find_city(name: &str) -> Option<&'static City> {
    let needle = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(needle))
}
