//! Behavior profile learning, caching, and the clock it is keyed by.

pub mod cache;
pub mod clock;
pub mod learner;

pub use cache::ProfileCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use learner::{BehaviorProfileLearner, build_profile};
