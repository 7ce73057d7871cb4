//! Engine configuration.
//!
//! Resolution order:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`--config`)
//! 3. environment overrides (`.env` is loaded first if present)
//!
//! The result is validated once; an invalid table stops startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::blend::BlendConfig;
use crate::error::AppError;

pub const ENV_MIN_SYNTHETIC_RATIO: &str = "PRESENCE_MIN_SYNTHETIC_RATIO";
pub const ENV_MAX_SYNTHETIC_RATIO: &str = "PRESENCE_MAX_SYNTHETIC_RATIO";
pub const ENV_PROFILE_TTL_SECS: &str = "PRESENCE_PROFILE_TTL_SECS";
pub const ENV_STABLE_SYNTHETIC_IDS: &str = "PRESENCE_STABLE_SYNTHETIC_IDS";

/// Largest TTL a `chrono::Duration` can hold at millisecond precision.
pub const MAX_PROFILE_TTL_SECS: u64 = (i64::MAX / 1_000) as u64;
/// Ten years of activity history.
pub const MAX_PROFILE_WINDOW_DAYS: u32 = 3_650;
pub const MAX_ACTIVE_WINDOW_MINUTES: i64 = MAX_PROFILE_WINDOW_DAYS as i64 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Trailing window of authentic activity, in days.
    pub window_days: u32,
    /// Cache staleness bound, in seconds.
    pub ttl_secs: u64,
    /// Cardinality cap for the city histogram.
    pub top_cities: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            ttl_secs: 3_600,
            top_cities: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub min_radius_m: f64,
    pub max_radius_m: f64,
    pub max_limit: usize,
    /// Storage over-fetch multiplier applied to the requested limit.
    pub over_fetch_factor: usize,
    /// An authentic entity counts as working if active this recently.
    pub active_window_minutes: i64,
    /// Density used when no configured city is close enough.
    pub flat_density_per_km2: f64,
    /// Derive synthetic ids from `(seed, index)` instead of drawing them.
    pub stable_synthetic_ids: bool,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            min_radius_m: 100.0,
            max_radius_m: 50_000.0,
            max_limit: 200,
            over_fetch_factor: 2,
            active_window_minutes: 240,
            flat_density_per_km2: 500.0,
            stable_synthetic_ids: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub blend: BlendConfig,
    pub profile: ProfileConfig,
    pub geo: GeoConfig,
}

impl EngineConfig {
    /// Load from an optional TOML file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    AppError::io(format!("Failed to read config '{}': {e}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        dotenvy::dotenv().ok();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| AppError::configuration(format!("Invalid config TOML: {e}")))
    }

    /// Apply `PRESENCE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MIN_SYNTHETIC_RATIO) {
            self.blend.min_synthetic_ratio = parse_override(ENV_MIN_SYNTHETIC_RATIO, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_SYNTHETIC_RATIO) {
            self.blend.max_synthetic_ratio = parse_override(ENV_MAX_SYNTHETIC_RATIO, &v)?;
        }
        if let Some(v) = lookup(ENV_PROFILE_TTL_SECS) {
            self.profile.ttl_secs = parse_override(ENV_PROFILE_TTL_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_STABLE_SYNTHETIC_IDS) {
            self.geo.stable_synthetic_ids = parse_override(ENV_STABLE_SYNTHETIC_IDS, &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.blend.validate()?;

        if !(1..=MAX_PROFILE_WINDOW_DAYS).contains(&self.profile.window_days) {
            return Err(AppError::configuration(format!(
                "profile.window_days must be in [1, {MAX_PROFILE_WINDOW_DAYS}], got {}.",
                self.profile.window_days
            )));
        }
        if self.profile.ttl_secs > MAX_PROFILE_TTL_SECS {
            return Err(AppError::configuration(format!(
                "profile.ttl_secs must be <= {MAX_PROFILE_TTL_SECS}, got {}.",
                self.profile.ttl_secs
            )));
        }
        if self.profile.top_cities == 0 {
            return Err(AppError::configuration("profile.top_cities must be >= 1."));
        }

        let geo = &self.geo;
        if !(geo.min_radius_m.is_finite()
            && geo.max_radius_m.is_finite()
            && geo.min_radius_m > 0.0
            && geo.max_radius_m >= geo.min_radius_m)
        {
            return Err(AppError::configuration(format!(
                "Invalid radius bounds: min={}, max={}.",
                geo.min_radius_m, geo.max_radius_m
            )));
        }
        if geo.max_limit == 0 || geo.over_fetch_factor == 0 {
            return Err(AppError::configuration("geo.max_limit and geo.over_fetch_factor must be >= 1."));
        }
        if !(0..=MAX_ACTIVE_WINDOW_MINUTES).contains(&geo.active_window_minutes) {
            return Err(AppError::configuration(format!(
                "geo.active_window_minutes must be in [0, {MAX_ACTIVE_WINDOW_MINUTES}], got {}.",
                geo.active_window_minutes
            )));
        }
        if !(geo.flat_density_per_km2.is_finite() && geo.flat_density_per_km2 >= 0.0) {
            return Err(AppError::configuration("geo.flat_density_per_km2 must be finite and >= 0."));
        }
        Ok(())
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|e| AppError::configuration(format!("{key}={raw:?} is not valid: {e}")))?;
    warn!(key, value = raw.trim(), "configuration overridden from environment");
    Ok(value)
}
