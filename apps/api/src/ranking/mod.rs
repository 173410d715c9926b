//! Ranking: dense 1..N ranks per job, kept consistent under concurrent uploads,
//! deletions, manual moves and weight changes.
//!
//! `plan` is pure. `RankManager` and `JobWeightPropagator` serialise work per job
//! with `JobLocks` and hand each plan to the store as one atomic `JobMutation`.

pub mod locks;
pub mod manager;
pub mod plan;
pub mod propagator;

pub use locks::JobLocks;
pub use manager::RankManager;
pub use plan::Direction;
pub use propagator::JobWeightPropagator;
