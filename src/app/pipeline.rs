//! Shared engine construction used by every CLI command.
//!
//! config -> store (optional fixture) -> clock (fixed `--at` or system) -> engine

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::config::EngineConfig;
use crate::domain::GeoPoint;
use crate::engine::PresenceEngine;
use crate::error::AppError;
use crate::profile::{Clock, FixedClock, SystemClock};
use crate::store::MemoryStore;

/// An empty store when no fixture is given.
pub fn open_store(fixture: Option<&Path>) -> Result<MemoryStore, AppError> {
    match fixture {
        Some(path) => MemoryStore::from_json_file(path),
        None => Ok(MemoryStore::default()),
    }
}

pub fn clock_for(at: Option<NaiveDateTime>) -> Arc<dyn Clock> {
    match at {
        Some(at) => Arc::new(FixedClock::new(at)),
        None => Arc::new(SystemClock),
    }
}

pub fn build_engine(
    config: EngineConfig,
    fixture: Option<&Path>,
    at: Option<NaiveDateTime>,
) -> Result<PresenceEngine<MemoryStore>, AppError> {
    let store = open_store(fixture)?;
    PresenceEngine::with_clock(config, store, clock_for(at))
}

/// Boundary check for user-supplied coordinates.
pub fn parse_center(lat: f64, lon: f64) -> Result<GeoPoint, AppError> {
    let center = GeoPoint::new(lat, lon);
    if center.is_valid() {
        Ok(center)
    } else {
        Err(AppError::invalid_input(format!(
            "Coordinates out of range: lat={lat}, lon={lon}."
        )))
    }
}
