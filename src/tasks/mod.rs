//! Task Registry Module
//!
//! Owns every task record in the fabric and its lifecycle
//! (`Pending -> Running -> Completed | Failed`).
//!
//! ## Architecture Overview
//! The registry follows a **pull-based** model:
//! 1. **Submission**: Callers create tasks via the platform API; tasks start
//!    `Pending` and accumulate until a node asks for work.
//! 2. **Assignment**: A polling node receives the oldest pending task. The
//!    scan-and-claim is a single critical section, so two nodes polling
//!    concurrently can never receive the same task.
//! 3. **Completion**: The assignee reports back and the task reaches
//!    `Completed` or `Failed`. No transition ever returns to `Pending`.
//!
//! ## Submodules
//! - **`types`**: Task record, id and status definitions.
//! - **`registry`**: The in-memory registry with FIFO atomic assignment.

pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;
