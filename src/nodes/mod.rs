//! Node Registry Module
//!
//! Owns the liveness record of every worker node that has ever heartbeated.
//! Nodes register implicitly on their first heartbeat (idempotent upsert)
//! and are never deleted; a background sweep marks nodes that stop
//! heartbeating as offline.
//!
//! ## Submodules
//! - **`types`**: Node record, id and status definitions.
//! - **`registry`**: Heartbeat upserts, lookups and the stale sweep.

pub mod registry;
pub mod types;
