//! In-Memory Task Registry
//!
//! The single owner of all task records. Lookups and status scans go through
//! a `DashMap` for concurrent access; assignment additionally takes an
//! insertion-order lock so the first-pending-wins scan is serialized across
//! concurrent pulls.

use super::types::*;
use crate::nodes::types::NodeId;

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a result report was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompleteError {
    #[error("task not found")]
    NotFound,
    #[error("task is not running")]
    NotRunning,
    #[error("task is assigned to a different node")]
    WrongNode,
}

/// The central component managing task state.
pub struct TaskRegistry {
    /// Task records, keyed by id.
    tasks: DashMap<TaskId, Task>,
    /// Task ids in insertion order. `assign_next` scans this front to back
    /// while holding the lock, which makes scan-and-claim one atomic step.
    order: Mutex<Vec<TaskId>>,
}

impl TaskRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: DashMap::new(),
            order: Mutex::new(Vec::new()),
        })
    }

    /// Creates a new task in `Pending` state. Always succeeds.
    pub async fn create(
        &self,
        task_type: TaskType,
        model_id: String,
        input: String,
        parameters: serde_json::Value,
    ) -> Task {
        let task = Task {
            id: TaskId::new(),
            task_type,
            model_id,
            input,
            parameters,
            status: TaskStatus::Pending,
            node_id: None,
            result: None,
            created_at: now_ms(),
        };

        self.tasks.insert(task.id.clone(), task.clone());
        self.order.lock().await.push(task.id.clone());

        tracing::info!("Created task {} (model: {})", task.id.0, task.model_id);

        task
    }

    /// Read-only lookup.
    pub fn get(&self, task_id: &TaskId) -> Option<Task> {
        self.tasks.get(task_id).map(|entry| entry.clone())
    }

    /// True iff any task is currently `Pending`.
    ///
    /// Used by the heartbeat path to spare nodes a pull round-trip when no
    /// work exists.
    pub fn has_pending(&self) -> bool {
        self.tasks
            .iter()
            .any(|entry| entry.status == TaskStatus::Pending)
    }

    /// Atomically assigns the oldest `Pending` task to `node_id`.
    ///
    /// Transitions the task to `Running` and binds `node_id` in one step,
    /// returning the updated record. `None` when nothing is pending.
    ///
    /// The scan holds the insertion-order lock for its whole duration, so
    /// two nodes pulling concurrently can never claim the same task.
    pub async fn assign_next(&self, node_id: &NodeId) -> Option<Task> {
        let order = self.order.lock().await;

        for task_id in order.iter() {
            if let Some(mut entry) = self.tasks.get_mut(task_id) {
                if entry.status != TaskStatus::Pending {
                    continue;
                }

                entry.status = TaskStatus::Running;
                entry.node_id = Some(node_id.clone());

                tracing::info!("Assigned task {} to node {}", task_id.0, node_id.0);
                return Some(entry.clone());
            }
        }

        None
    }

    /// Marks a `Running` task as `Completed` or `Failed`, storing the
    /// reported result or error message.
    ///
    /// Only the assignee may complete a task, and only once; terminal states
    /// never transition again.
    pub fn complete(
        &self,
        task_id: &TaskId,
        node_id: &NodeId,
        outcome: Result<String, String>,
    ) -> Result<Task, CompleteError> {
        let mut entry = self.tasks.get_mut(task_id).ok_or(CompleteError::NotFound)?;

        if entry.status != TaskStatus::Running {
            return Err(CompleteError::NotRunning);
        }
        if entry.node_id.as_ref() != Some(node_id) {
            return Err(CompleteError::WrongNode);
        }

        match outcome {
            Ok(result) => {
                entry.status = TaskStatus::Completed;
                entry.result = Some(result);
                tracing::info!("Task {} completed by node {}", task_id.0, node_id.0);
            }
            Err(error) => {
                entry.status = TaskStatus::Failed;
                entry.result = Some(error);
                tracing::warn!("Task {} failed on node {}", task_id.0, node_id.0);
            }
        }

        Ok(entry.clone())
    }

    /// Total number of tasks ever created.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Full-scan tally of (pending, running, completed, failed).
    ///
    /// Stats are derived at request time, not incrementally maintained.
    pub fn status_counts(&self) -> (usize, usize, usize, usize) {
        let mut pending = 0;
        let mut running = 0;
        let mut completed = 0;
        let mut failed = 0;

        for entry in self.tasks.iter() {
            match entry.status {
                TaskStatus::Pending => pending += 1,
                TaskStatus::Running => running += 1,
                TaskStatus::Completed => completed += 1,
                TaskStatus::Failed => failed += 1,
            }
        }

        (pending, running, completed, failed)
    }
}
