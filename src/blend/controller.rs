//! Population blend control.
//!
//! One monotone input, the authentic population size, drives how much
//! synthetic filler a result set gets. The mapping is table-driven: the
//! largest satisfied milestone wins, and below the first milestone the
//! cold-start maximum applies.

use rand::Rng;

use crate::blend::config::BlendConfig;
use crate::domain::NearbyEntity;
use crate::error::AppError;

/// Upper bound of the per-call jitter added to ranking weights.
const RANK_JITTER: f64 = 0.3;

/// Anything that can be ranked in a mixed authentic/synthetic list.
pub trait Provenance {
    fn is_authentic(&self) -> bool;
}

impl Provenance for NearbyEntity {
    fn is_authentic(&self) -> bool {
        NearbyEntity::is_authentic(self)
    }
}

#[derive(Debug, Clone)]
pub struct PopulationBlendController {
    config: BlendConfig,
}

impl PopulationBlendController {
    /// Validates the config; an invalid table is a startup failure.
    pub fn new(config: BlendConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Ratio of the largest milestone at or below `authentic_count`, or the
    /// cold-start maximum. Validation keeps every milestone within bounds.
    pub fn target_synthetic_ratio(&self, authentic_count: u64) -> f64 {
        self.config
            .milestones
            .iter()
            .rev()
            .find(|m| m.threshold <= authentic_count)
            .map_or(self.config.max_synthetic_ratio, |m| m.ratio)
    }

    /// How many synthetic entities to add to reach the target mix.
    ///
    /// Never negative, and never lets `authentic + synthetic` exceed
    /// `target_total`.
    pub fn required_synthetic_count(
        &self,
        authentic_count: usize,
        current_synthetic: usize,
        target_total: usize,
    ) -> usize {
        let ratio = self.target_synthetic_ratio(authentic_count as u64);
        let target = (target_total as f64 * ratio).floor() as usize;
        let needed = target.saturating_sub(current_synthetic);
        needed.min(target_total.saturating_sub(authentic_count))
    }

    /// Order a mixed list so authentic entries usually lead, with fresh
    /// per-call jitter so the order never looks mechanical.
    pub fn rank_mixed<T: Provenance>(&self, entities: Vec<T>) -> Vec<T> {
        self.rank_mixed_with(entities, &mut rand::thread_rng())
    }

    pub fn rank_mixed_with<T, R>(&self, entities: Vec<T>, rng: &mut R) -> Vec<T>
    where
        T: Provenance,
        R: Rng + ?Sized,
    {
        let mut keyed: Vec<(f64, T)> = entities
            .into_iter()
            .map(|e| {
                let base = if e.is_authentic() {
                    self.config.authentic_weight
                } else {
                    self.config.synthetic_weight
                };
                (base + rng.gen_range(0.0..RANK_JITTER), e)
            })
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        keyed.into_iter().map(|(_, e)| e).collect()
    }
}
