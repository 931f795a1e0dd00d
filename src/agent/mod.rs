//! Agent Module
//!
//! The worker-side client role of the fabric. A single logical loop: sleep
//! for the configured interval, heartbeat, and when the platform reports
//! work, pull exactly one task, execute it through the opaque executor and
//! report the result back.
//!
//! Every heartbeat or pull failure is non-fatal; the agent logs it and tries
//! again at the next interval. There is no backoff or retry budget. The only
//! way out of the loop is the shutdown signal.
//!
//! ## Submodules
//! - **`executor`**: The opaque compute seam and its simulated stand-in.

pub mod executor;

#[cfg(test)]
mod tests;

use crate::nodes::types::{NodeId, NodeStatus};
use crate::platform::protocol::{
    HeartbeatRequest, HeartbeatResponse, ReportResultRequest, ReportedStatus, ENDPOINT_HEARTBEAT,
};
use crate::tasks::types::Task;

use self::executor::InferenceExecutor;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Agent-side configuration. All fields have working defaults for local
/// testing against a platform on port 8080.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub node_id: NodeId,
    pub platform_url: String,
    pub gpu_model: String,
    pub gpu_memory: u64,
    pub heartbeat_interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            node_id: NodeId::generate(),
            platform_url: "http://localhost:8080".to_string(),
            gpu_model: "Test-GPU".to_string(),
            gpu_memory: 8192,
            heartbeat_interval: Duration::from_secs(10),
        }
    }
}

/// The worker-side loop driver.
pub struct Agent {
    config: AgentConfig,
    executor: Arc<dyn InferenceExecutor>,
    client: reqwest::Client,
}

impl Agent {
    pub fn new(config: AgentConfig, executor: Arc<dyn InferenceExecutor>) -> Self {
        Self {
            config,
            executor,
            client: reqwest::Client::new(),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.config.node_id
    }

    /// Runs the heartbeat loop until `shutdown` fires (or its sender is
    /// dropped).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Agent {} started (GPU: {} {}MB, platform: {})",
            self.config.node_id.0,
            self.config.gpu_model,
            self.config.gpu_memory,
            self.config.platform_url
        );

        loop {
            if let Err(e) = self.poll_once().await {
                tracing::warn!("Heartbeat cycle failed: {:#}", e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.heartbeat_interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Agent {} stopped", self.config.node_id.0);
    }

    /// One full cycle: heartbeat, and when work is available, pull, execute
    /// and report.
    pub async fn poll_once(&self) -> Result<()> {
        let response = self.send_heartbeat().await?;

        if response.has_task {
            tracing::info!("Platform reports pending work");
            self.pull_and_execute().await?;
        }

        Ok(())
    }

    async fn send_heartbeat(&self) -> Result<HeartbeatResponse> {
        let req = HeartbeatRequest {
            node_id: self.config.node_id.clone(),
            gpu_model: self.config.gpu_model.clone(),
            gpu_memory: self.config.gpu_memory,
            // Simulated telemetry; the platform accepts but ignores it.
            gpu_utilization: 0.0,
            temperature: 65.0,
            status: NodeStatus::Online,
        };

        let response = self
            .client
            .post(format!("{}{}", self.config.platform_url, ENDPOINT_HEARTBEAT))
            .json(&req)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("platform unreachable")?;

        if !response.status().is_success() {
            bail!("heartbeat rejected: {}", response.status());
        }

        let body: HeartbeatResponse = response.json().await?;
        tracing::debug!("Heartbeat ok (has_task: {})", body.has_task);

        Ok(body)
    }

    async fn pull_and_execute(&self) -> Result<()> {
        let task = match self.pull_task().await? {
            Some(task) => task,
            None => {
                tracing::info!("No task available");
                return Ok(());
            }
        };

        tracing::info!(
            "Received task {} (model: {}, input: {:.50})",
            task.id.0,
            task.model_id,
            task.input
        );

        let outcome = self.executor.execute(&task).await;

        match &outcome {
            Ok(result) => tracing::info!("Task {} finished: {:.50}", task.id.0, result),
            Err(e) => tracing::warn!("Task {} execution failed: {:#}", task.id.0, e),
        }

        self.report_result(&task, outcome).await
    }

    async fn pull_task(&self) -> Result<Option<Task>> {
        let response = self
            .client
            .get(format!(
                "{}/node/{}/task",
                self.config.platform_url, self.config.node_id.0
            ))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("platform unreachable")?;

        // Another node may have raced us for the last pending task between
        // the heartbeat and this pull.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            bail!("task pull failed: {}", response.status());
        }

        Ok(Some(response.json().await?))
    }

    async fn report_result(&self, task: &Task, outcome: Result<String>) -> Result<()> {
        let req = match outcome {
            Ok(result) => ReportResultRequest {
                node_id: self.config.node_id.clone(),
                status: ReportedStatus::Completed,
                result: Some(result),
                error: None,
            },
            Err(e) => ReportResultRequest {
                node_id: self.config.node_id.clone(),
                status: ReportedStatus::Failed,
                result: None,
                error: Some(format!("{:#}", e)),
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/task/{}/result",
                self.config.platform_url, task.id.0
            ))
            .json(&req)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("platform unreachable")?;

        if !response.status().is_success() {
            bail!("result report rejected: {}", response.status());
        }

        tracing::debug!("Reported result for task {}", task.id.0);

        Ok(())
    }
}
