use super::protocol::*;
use crate::nodes::registry::NodeRegistry;
use crate::nodes::types::NodeId;
use crate::tasks::registry::{CompleteError, TaskRegistry};
use crate::tasks::types::{Task, TaskId, TaskType};

use axum::{extract::Path, http::StatusCode, Extension, Json};
use std::sync::Arc;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn conflict(message: &str) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `POST /inference`: creates a pending task and returns the full record.
pub async fn handle_create_inference(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Json(req): Json<InferenceRequest>,
) -> Json<Task> {
    let task = tasks
        .create(TaskType::Inference, req.model_id, req.input, req.parameters)
        .await;

    Json(task)
}

/// `GET /task/:id/status`: read-only task lookup.
pub async fn handle_get_task_status(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task_id = TaskId(task_id);

    match tasks.get(&task_id) {
        Some(task) => Ok(Json(task)),
        None => {
            tracing::debug!("Task not found: {}", task_id.0);
            Err(not_found("task not found"))
        }
    }
}

/// `POST /node/heartbeat`: upserts the node, then reports whether any task
/// is pending so the node can decide to pull.
pub async fn handle_heartbeat(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Extension(nodes): Extension<Arc<NodeRegistry>>,
    Json(req): Json<HeartbeatRequest>,
) -> Json<HeartbeatResponse> {
    nodes.upsert_heartbeat(&req.node_id, &req.gpu_model, req.gpu_memory, req.status);

    let has_task = tasks.has_pending();

    Json(HeartbeatResponse {
        status: "ok".to_string(),
        has_task,
    })
}

/// `GET /node/:id/task`: atomically assigns the oldest pending task to the
/// calling node. Pulls from nodes that never heartbeated are rejected.
pub async fn handle_pull_task(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Extension(nodes): Extension<Arc<NodeRegistry>>,
    Path(node_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let node_id = NodeId(node_id);

    if !nodes.exists(&node_id) {
        tracing::warn!("Task pull from unregistered node {}", node_id.0);
        return Err(not_found("node not found"));
    }

    match tasks.assign_next(&node_id).await {
        Some(task) => Ok(Json(task)),
        None => Err(not_found("no task available")),
    }
}

/// `POST /task/:id/result`: the assignee reports the outcome, completing the
/// `Running -> Completed | Failed` transition.
pub async fn handle_report_result(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Path(task_id): Path<String>,
    Json(req): Json<ReportResultRequest>,
) -> Result<Json<Task>, ApiError> {
    let task_id = TaskId(task_id);

    let outcome = match req.status {
        ReportedStatus::Completed => Ok(req.result.unwrap_or_default()),
        ReportedStatus::Failed => Err(req
            .error
            .unwrap_or_else(|| "unspecified failure".to_string())),
    };

    match tasks.complete(&task_id, &req.node_id, outcome) {
        Ok(task) => Ok(Json(task)),
        Err(CompleteError::NotFound) => Err(not_found("task not found")),
        Err(e) => {
            tracing::warn!(
                "Rejected result report for task {} from node {}: {}",
                task_id.0,
                req.node_id.0,
                e
            );
            Err(conflict(&e.to_string()))
        }
    }
}

/// `GET /stats`: cluster-wide tallies, computed by full scans.
pub async fn handle_stats(
    Extension(tasks): Extension<Arc<TaskRegistry>>,
    Extension(nodes): Extension<Arc<NodeRegistry>>,
) -> Json<StatsResponse> {
    let (pending, running, _completed, _failed) = tasks.status_counts();
    let (total_nodes, online_nodes) = nodes.counts();

    Json(StatsResponse {
        total_tasks: tasks.len(),
        pending_tasks: pending,
        running_tasks: running,
        total_nodes,
        online_nodes,
    })
}
