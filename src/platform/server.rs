//! Router construction and the platform serve loop.
//!
//! The registries are explicit state injected into the router, so tests can
//! stand up multiple isolated platform instances in-process.

use super::handlers::*;
use super::protocol::{ENDPOINT_HEALTH, ENDPOINT_HEARTBEAT, ENDPOINT_INFERENCE, ENDPOINT_STATS};
use crate::nodes::registry::NodeRegistry;
use crate::tasks::registry::TaskRegistry;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the platform router over the given registries.
pub fn router(tasks: Arc<TaskRegistry>, nodes: Arc<NodeRegistry>) -> Router {
    Router::new()
        .route(ENDPOINT_HEALTH, get(handle_health))
        .route(ENDPOINT_INFERENCE, post(handle_create_inference))
        .route("/task/:id/status", get(handle_get_task_status))
        .route("/task/:id/result", post(handle_report_result))
        .route(ENDPOINT_HEARTBEAT, post(handle_heartbeat))
        .route("/node/:id/task", get(handle_pull_task))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(Extension(tasks))
        .layer(Extension(nodes))
}

/// Binds `addr` and serves the platform until the process exits.
pub async fn serve(
    addr: SocketAddr,
    tasks: Arc<TaskRegistry>,
    nodes: Arc<NodeRegistry>,
) -> Result<()> {
    let app = router(tasks, nodes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Platform listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
