//! The opaque compute seam.
//!
//! The fabric does not care how inference happens; a task payload goes in
//! and a result string comes out. Real GPU backends implement
//! `InferenceExecutor`; the shipped `SimulatedExecutor` stands in for them
//! during testing.

use crate::tasks::types::{Task, TaskType};

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Type-erased future returned by executors, so different backends can live
/// behind the same trait object.
pub type ExecutionFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

pub trait InferenceExecutor: Send + Sync {
    fn execute<'a>(&'a self, task: &'a Task) -> ExecutionFuture<'a>;
}

/// Stand-in executor: sleeps for a fixed delay and echoes the input back.
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl InferenceExecutor for SimulatedExecutor {
    fn execute<'a>(&'a self, task: &'a Task) -> ExecutionFuture<'a> {
        Box::pin(async move {
            tracing::debug!("Running simulated inference for task {}", task.id.0);
            tokio::time::sleep(self.delay).await;

            match task.task_type {
                TaskType::Inference => Ok(format!("Simulated response for '{}'", task.input)),
            }
        })
    }
}
