//! `stockbook-costing` — the inventory costing engine.
//!
//! Replays a product's movement stream up to a cutoff date and folds it into
//! a [`CostingSnapshot`]: on-hand quantity, weighted-average unit cost and
//! total value. The engine is a pure function of (ledger contents, cutoff,
//! policy): it never writes, never locks, and two concurrent invocations each
//! fold their own in-memory accumulator.
//!
//! Replay cost is O(movements) per call by design; [`cache`] bounds repeated
//! report cost without ever diverging from full replay.

pub mod balance;
pub mod cache;
pub mod engine;
pub mod snapshot;

pub use balance::{OutflowPolicy, RunningBalance, Shortfall};
pub use cache::{CachedSnapshot, InMemorySnapshotCache, SnapshotCache};
pub use engine::{CostingEngine, CostingError, replay};
pub use snapshot::CostingSnapshot;
