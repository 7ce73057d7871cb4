//! Blend configuration: the milestone table and ranking weights.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One row of the milestone table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Minimum authentic population for this ratio to apply.
    pub threshold: u64,
    /// Target share of synthetic entities in a result set.
    pub ratio: f64,
}

/// Static blend configuration, loaded once at startup.
///
/// # Example
/// ```
/// use presence_engine::blend::BlendConfig;
///
/// let config = BlendConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_synthetic_ratio, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub min_synthetic_ratio: f64,
    /// Ratio used below the first milestone (cold start).
    pub max_synthetic_ratio: f64,
    /// Sorted strictly ascending by threshold.
    pub milestones: Vec<Milestone>,
    pub authentic_weight: f64,
    pub synthetic_weight: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            min_synthetic_ratio: 0.2,
            max_synthetic_ratio: 0.9,
            milestones: vec![
                Milestone { threshold: 10, ratio: 0.8 },
                Milestone { threshold: 50, ratio: 0.7 },
                Milestone { threshold: 100, ratio: 0.6 },
                Milestone { threshold: 500, ratio: 0.5 },
                Milestone { threshold: 1_000, ratio: 0.4 },
                Milestone { threshold: 5_000, ratio: 0.3 },
                Milestone { threshold: 10_000, ratio: 0.2 },
            ],
            authentic_weight: 3.0,
            synthetic_weight: 1.0,
        }
    }
}

impl BlendConfig {
    /// Startup invariant check. Never evaluated per request.
    pub fn validate(&self) -> Result<(), AppError> {
        let unit = 0.0..=1.0;
        if !(unit.contains(&self.min_synthetic_ratio) && unit.contains(&self.max_synthetic_ratio)) {
            return Err(AppError::configuration(format!(
                "Synthetic ratio bounds must lie in [0, 1]: min={}, max={}.",
                self.min_synthetic_ratio, self.max_synthetic_ratio
            )));
        }
        if self.min_synthetic_ratio > self.max_synthetic_ratio {
            return Err(AppError::configuration(format!(
                "min_synthetic_ratio ({}) exceeds max_synthetic_ratio ({}).",
                self.min_synthetic_ratio, self.max_synthetic_ratio
            )));
        }
        if self.milestones.is_empty() {
            return Err(AppError::configuration("Milestone table is empty."));
        }
        if let Some(m) = self.milestones.iter().find(|m| !unit.contains(&m.ratio)) {
            return Err(AppError::configuration(format!(
                "Milestone at threshold {} has ratio {} outside [0, 1].",
                m.threshold, m.ratio
            )));
        }
        let bounds = self.min_synthetic_ratio..=self.max_synthetic_ratio;
        if let Some(m) = self.milestones.iter().find(|m| !bounds.contains(&m.ratio)) {
            return Err(AppError::configuration(format!(
                "Milestone at threshold {} has ratio {} outside [{}, {}].",
                m.threshold, m.ratio, self.min_synthetic_ratio, self.max_synthetic_ratio
            )));
        }
        if let Some(pair) = self.milestones.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            return Err(AppError::configuration(format!(
                "Milestone thresholds must be strictly ascending ({} then {}).",
                pair[0].threshold, pair[1].threshold
            )));
        }
        for (name, w) in [
            ("authentic_weight", self.authentic_weight),
            ("synthetic_weight", self.synthetic_weight),
        ] {
            if !(w.is_finite() && w > 0.0) {
                return Err(AppError::configuration(format!("{name} must be finite and > 0, got {w}.")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsorted_milestones() {
        let mut config = BlendConfig::default();
        config.milestones.swap(0, 1);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn rejects_duplicate_thresholds() {
        let mut config = BlendConfig::default();
        config.milestones[1].threshold = config.milestones[0].threshold;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_table() {
        let config = BlendConfig {
            milestones: Vec::new(),
            ..BlendConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_milestone_below_min_ratio() {
        let config = BlendConfig {
            min_synthetic_ratio: 0.3,
            milestones: vec![
                Milestone { threshold: 10, ratio: 0.8 },
                Milestone { threshold: 1_000, ratio: 0.1 },
            ],
            ..BlendConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_milestone_above_max_ratio() {
        let mut config = BlendConfig::default();
        config.max_synthetic_ratio = 0.75;
        assert!(matches!(config.validate(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn rejects_inverted_bounds_and_bad_weights() {
        let inverted = BlendConfig {
            min_synthetic_ratio: 0.8,
            max_synthetic_ratio: 0.5,
            ..BlendConfig::default()
        };
        assert!(inverted.validate().is_err());

        let zero_weight = BlendConfig {
            synthetic_weight: 0.0,
            ..BlendConfig::default()
        };
        assert!(zero_weight.validate().is_err());
    }
}
