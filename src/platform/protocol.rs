//! Platform Protocol Definitions
//!
//! Defines the Data Transfer Objects (DTOs) of the platform's HTTP surface,
//! shared between the server handlers and the agent-side client.
//!
//! Constants define the fixed API endpoints; parametrized paths
//! (`/task/{id}/status`, `/node/{id}/task`, `/task/{id}/result`) are built
//! inline by their callers.

use crate::nodes::types::{NodeId, NodeStatus};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_HEALTH: &str = "/health";
pub const ENDPOINT_INFERENCE: &str = "/inference";
pub const ENDPOINT_HEARTBEAT: &str = "/node/heartbeat";
pub const ENDPOINT_STATS: &str = "/stats";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of `POST /inference`. `parameters` is opaque and optional.
#[derive(Debug, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub model_id: String,
    pub input: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Body of `POST /node/heartbeat`.
///
/// `gpu_utilization` and `temperature` are pass-through telemetry
/// placeholders: accepted, but not stored or used for any decision.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub node_id: NodeId,
    pub gpu_model: String,
    pub gpu_memory: u64,
    #[serde(default)]
    pub gpu_utilization: f64,
    #[serde(default)]
    pub temperature: f64,
    pub status: NodeStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub status: String,
    /// True iff at least one task was `Pending` at the instant of the
    /// heartbeat. The signal channel for "work is available".
    pub has_task: bool,
}

/// Terminal state claimed by a result report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportedStatus {
    Completed,
    Failed,
}

/// Body of `POST /task/{id}/result`, sent by the assignee after execution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResultRequest {
    pub node_id: NodeId,
    pub status: ReportedStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /stats`. All values are derived by full scans at
/// request time.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub running_tasks: usize,
    pub total_nodes: usize,
    pub online_nodes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
