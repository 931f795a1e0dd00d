use crate::nodes::types::NodeId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a task within the fabric.
///
/// Wrapper around a UUID string to ensure global uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generates a new random UUID v4-based TaskId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// The kind of work a task carries. Inference is the only kind today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Inference,
}

/// Represents the lifecycle state of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has been submitted but not yet picked up by any node.
    Pending,
    /// Task has been assigned to a node and is being processed.
    Running,
    /// Task finished successfully; `result` holds the output.
    Completed,
    /// Task execution failed; `result` holds the error message.
    Failed,
}

/// A unit of submitted inference work.
///
/// `model_id`, `input` and `parameters` are opaque caller payload; the
/// registry never interprets them. `node_id` is set exactly once, at
/// assignment time, and is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub model_id: String,
    pub input: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
    pub status: TaskStatus,
    pub node_id: Option<NodeId>,
    pub result: Option<String>,
    /// Timestamp (ms) when the task was submitted.
    pub created_at: u64,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
