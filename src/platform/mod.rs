//! Platform Coordination Module
//!
//! The HTTP glue between the registries and the outside world. On each
//! heartbeat it decides and reports whether work is available; on each pull
//! it atomically hands a task to the calling node; on each result report it
//! closes the task lifecycle.
//!
//! ## Submodules
//! - **`protocol`**: The request/response DTOs of the HTTP surface.
//! - **`handlers`**: One axum handler per endpoint, over injected registries.
//! - **`server`**: Router construction and the serve loop.

pub mod handlers;
pub mod protocol;
pub mod server;
