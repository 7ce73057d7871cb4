//! Single-slot profile cache with a staleness bound.
//!
//! Last write wins. The lock is held only to swap the slot, never while a
//! profile is being computed, so two racing recomputes just store twice.

use std::sync::{Arc, RwLock};

use chrono::{Duration, NaiveDateTime};

use crate::domain::BehaviorProfile;

#[derive(Debug, Clone)]
struct CachedProfile {
    profile: Arc<BehaviorProfile>,
    stored_at: NaiveDateTime,
}

#[derive(Debug)]
pub struct ProfileCache {
    ttl: Duration,
    slot: RwLock<Option<CachedProfile>>,
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value and whether it is older than the TTL at `now`.
    pub fn get(&self, now: NaiveDateTime) -> Option<(Arc<BehaviorProfile>, bool)> {
        let guard = self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().map(|cached| {
            let is_stale = now - cached.stored_at >= self.ttl;
            (Arc::clone(&cached.profile), is_stale)
        })
    }

    pub fn put(&self, profile: Arc<BehaviorProfile>, now: NaiveDateTime) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(CachedProfile {
            profile,
            stored_at: now,
        });
    }

    pub fn clear(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }
}
