//! In-memory store loadable from a JSON fixture.
//!
//! Fixture layout:
//!
//! ```json
//! {
//!   "entities": [
//!     { "id": "u-1", "position": { "lat": 22.54, "lon": 114.05 },
//!       "last_activity": "2026-03-10T20:15:00", "category": "overtime" }
//!   ],
//!   "activity": [
//!     { "timestamp": "2026-03-09T22:10:00", "category": "overtime",
//!       "city": "Shenzhen", "industry": "tech", "content_length": 64 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityRow, AuthenticEntity, BoundingBox};
use crate::error::AppError;
use crate::store::{ActivitySource, PresenceStore};

/// A stored entity plus its provenance flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(flatten)]
    pub entity: AuthenticEntity,
    /// Seeded stand-ins persisted by older tooling.
    #[serde(default)]
    pub is_synthetic: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub activity: Vec<ActivityRow>,
}

impl MemoryStore {
    pub fn new(entities: Vec<EntityRecord>, activity: Vec<ActivityRow>) -> Self {
        Self { entities, activity }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let store: MemoryStore = serde_json::from_str(raw)
            .map_err(|e| AppError::invalid_input(format!("Invalid store fixture: {e}")))?;
        if let Some(bad) = store.entities.iter().find(|r| !r.entity.position.is_valid()) {
            return Err(AppError::invalid_input(format!(
                "Entity '{}' has out-of-range coordinates.",
                bad.entity.id
            )));
        }
        Ok(store)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Failed to read fixture '{}': {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn push_authentic(&mut self, entity: AuthenticEntity) {
        self.entities.push(EntityRecord {
            entity,
            is_synthetic: false,
        });
    }
}

impl ActivitySource for MemoryStore {
    fn activity_since(&self, since: NaiveDateTime) -> Result<Vec<ActivityRow>, AppError> {
        Ok(self
            .activity
            .iter()
            .filter(|row| row.timestamp >= since && !row.is_synthetic)
            .cloned()
            .collect())
    }
}

impl PresenceStore for MemoryStore {
    fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        authentic_only: bool,
        fetch_limit: usize,
    ) -> Result<Vec<AuthenticEntity>, AppError> {
        let mut hits: Vec<&EntityRecord> = self
            .entities
            .iter()
            .filter(|r| !(authentic_only && r.is_synthetic))
            .filter(|r| bbox.contains(&r.entity.position))
            .collect();

        // Freshest first, like an `ORDER BY last_activity DESC LIMIT n` scan.
        hits.sort_by(|a, b| b.entity.last_activity.cmp(&a.entity.last_activity));
        Ok(hits
            .into_iter()
            .take(fetch_limit)
            .map(|r| r.entity.clone())
            .collect())
    }

    fn count_authentic(&self) -> Result<u64, AppError> {
        Ok(self.entities.iter().filter(|r| !r.is_synthetic).count() as u64)
    }
}
