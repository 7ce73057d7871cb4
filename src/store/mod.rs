//! Storage-facing seams.
//!
//! The engine never owns persistence. It reads through these traits, and the
//! host application plugs in its database. [`MemoryStore`] backs the CLI and
//! the tests.

use chrono::NaiveDateTime;

use crate::domain::{ActivityRow, AuthenticEntity, BoundingBox};
use crate::error::AppError;

pub mod memory;

pub use memory::{EntityRecord, MemoryStore};

/// Historical activity reader for the behavior profile learner.
pub trait ActivitySource {
    /// Rows with `timestamp >= since`. Implementations should exclude
    /// synthetic rows; the learner drops any that slip through.
    fn activity_since(&self, since: NaiveDateTime) -> Result<Vec<ActivityRow>, AppError>;
}

/// Entity reads needed by the nearby query and blend control.
pub trait PresenceStore: ActivitySource {
    /// At most `fetch_limit` entities inside `bbox`.
    fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        authentic_only: bool,
        fetch_limit: usize,
    ) -> Result<Vec<AuthenticEntity>, AppError>;

    /// Community-wide number of authentic entities. May lag concurrent writes.
    fn count_authentic(&self) -> Result<u64, AppError>;
}
