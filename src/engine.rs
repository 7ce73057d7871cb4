//! `PresenceEngine`: the facade the host application calls.
//!
//! It owns one validated [`EngineConfig`], the storage handle, the clock and
//! the profile cache, and wires the temporal model, the blend controller and
//! the geospatial synthesis together.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rand::Rng;

use crate::blend::PopulationBlendController;
use crate::config::EngineConfig;
use crate::data::{City, resolve_city};
use crate::domain::{BehaviorProfile, GeoPoint, Industry, NearbyEntity, NearbyQuery, NearbyResult};
use crate::error::AppError;
use crate::geo::GeospatialSynthesis;
use crate::models::compute_working_rate;
use crate::profile::{BehaviorProfileLearner, Clock, SystemClock};
use crate::store::PresenceStore;

pub struct PresenceEngine<S> {
    config: EngineConfig,
    store: S,
    clock: Arc<dyn Clock>,
    learner: BehaviorProfileLearner,
    blend: PopulationBlendController,
    geo: GeospatialSynthesis,
}

impl<S: PresenceStore> PresenceEngine<S> {
    pub fn new(config: EngineConfig, store: S) -> Result<Self, AppError> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Build with an explicit clock. Fails on an invalid config.
    pub fn with_clock(config: EngineConfig, store: S, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        config.validate()?;
        let blend = PopulationBlendController::new(config.blend.clone())?;
        let learner = BehaviorProfileLearner::new(config.profile.clone());
        let geo = GeospatialSynthesis::new(config.geo.clone());
        Ok(Self {
            config,
            store,
            clock,
            learner,
            blend,
            geo,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn blend(&self) -> &PopulationBlendController {
        &self.blend
    }

    pub fn geo(&self) -> &GeospatialSynthesis {
        &self.geo
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn working_rate(
        &self,
        at: NaiveDateTime,
        overtime_index: f64,
        industry: Option<Industry>,
        include_fluctuation: bool,
    ) -> f64 {
        compute_working_rate(at, overtime_index, industry, include_fluctuation)
    }

    /// Working rate at the engine clock for a configured city; unknown
    /// cities use an overtime index of 1.0.
    pub fn city_working_rate(&self, city: Option<&City>, industry: Option<Industry>) -> f64 {
        let overtime_index = city.map_or(1.0, |c| c.overtime_index);
        compute_working_rate(self.now(), overtime_index, industry, true)
    }

    pub fn behavior_profile(&self) -> Arc<BehaviorProfile> {
        self.learner.get_profile(&self.store, self.now())
    }

    pub fn target_synthetic_ratio(&self, authentic_count: u64) -> f64 {
        self.blend.target_synthetic_ratio(authentic_count)
    }

    /// Target ratio for the whole community, from the store's authentic count.
    pub fn community_target_ratio(&self) -> Result<f64, AppError> {
        let authentic = self.store.count_authentic()?;
        Ok(self.blend.target_synthetic_ratio(authentic))
    }

    pub fn nearby(&self, query: &NearbyQuery) -> Result<NearbyResult, AppError> {
        self.nearby_with(query, &mut rand::thread_rng())
    }

    /// [`Self::nearby`] with a caller-supplied RNG.
    pub fn nearby_with<R: Rng + ?Sized>(&self, query: &NearbyQuery, rng: &mut R) -> Result<NearbyResult, AppError> {
        let now = self.now();
        let profile = self.learner.get_profile(&self.store, now);
        self.geo.nearby(&self.store, &self.blend, &profile, query, now, rng)
    }

    pub fn estimated_area_total(&self, center: GeoPoint, radius_m: f64) -> u64 {
        self.geo.estimated_area_total(center, radius_m)
    }

    pub fn estimate_active_nearby(&self, center: GeoPoint, radius_m: f64) -> u64 {
        self.geo.estimate_active_nearby(center, radius_m, self.now())
    }

    pub fn resolve_city(&self, center: GeoPoint) -> Option<&'static City> {
        resolve_city(center)
    }

    pub fn rank_mixed(&self, entities: Vec<NearbyEntity>) -> Vec<NearbyEntity> {
        self.blend.rank_mixed(entities)
    }

    /// Drop the cached profile so the next read recomputes.
    pub fn invalidate_profile(&self) {
        self.learner.cache().clear();
    }
}
