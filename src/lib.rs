//! GPU Inference Fabric Library
//!
//! This library crate defines the core modules of a minimal job-distribution
//! fabric: a central platform accepts inference task submissions, holds them
//! until a worker node polls for work, and tracks per-node liveness via
//! periodic heartbeats.
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`tasks`**: The task registry. Owns task records and their lifecycle
//!   (`Pending -> Running -> Completed | Failed`) and hands out pending tasks
//!   to polling nodes in FIFO order with at-most-one-assignee semantics.
//! - **`nodes`**: The node registry. Owns node liveness records, updated by
//!   heartbeats and read by the assignment logic. A background sweep marks
//!   nodes that stop heartbeating as offline.
//! - **`platform`**: The HTTP coordination layer. Wires the registries to an
//!   axum router: task submission, heartbeats, task pulls, result reports
//!   and cluster stats.
//! - **`agent`**: The worker-side client. Periodically heartbeats, pulls a
//!   task when work is available, runs it through an opaque executor and
//!   reports the result back.

pub mod agent;
pub mod nodes;
pub mod platform;
pub mod tasks;
