//! Agent Tests
//!
//! ## Test Scopes
//! - **Executor**: The simulated inference stand-in.
//! - **Config**: Generated defaults.
//! - **Loop**: A full heartbeat -> pull -> execute -> report cycle against a
//!   real platform instance served on a loopback port.

#[cfg(test)]
mod tests {
    use crate::agent::executor::{InferenceExecutor, SimulatedExecutor};
    use crate::agent::{Agent, AgentConfig};
    use crate::nodes::registry::NodeRegistry;
    use crate::platform::server;
    use crate::tasks::registry::TaskRegistry;
    use crate::tasks::types::{TaskStatus, TaskType};

    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Serves a fresh platform on a loopback port, returning its registries
    /// and base URL.
    async fn spawn_platform() -> (Arc<TaskRegistry>, Arc<NodeRegistry>, String) {
        let tasks = TaskRegistry::new();
        let nodes = NodeRegistry::new();

        let app = server::router(tasks.clone(), nodes.clone());
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let listener = tokio::net::TcpListener::bind(bind).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (tasks, nodes, format!("http://{}", addr))
    }

    fn test_agent(platform_url: String) -> Agent {
        let config = AgentConfig {
            platform_url,
            heartbeat_interval: Duration::from_millis(10),
            ..AgentConfig::default()
        };
        Agent::new(config, Arc::new(SimulatedExecutor::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_simulated_executor_echoes_input() {
        let tasks = TaskRegistry::new();
        let task = tasks
            .create(
                TaskType::Inference,
                "gpt-x".to_string(),
                "hello".to_string(),
                serde_json::Value::Null,
            )
            .await;

        let executor = SimulatedExecutor::new(Duration::ZERO);
        let result = executor.execute(&task).await.expect("execution succeeds");

        assert!(result.contains("hello"));
    }

    #[test]
    fn test_config_defaults() {
        let config = AgentConfig::default();

        assert!(config.node_id.0.starts_with("node-"));
        assert_eq!(config.platform_url, "http://localhost:8080");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.gpu_memory, 8192);

        // Generated ids are unique across agents
        let other = AgentConfig::default();
        assert_ne!(config.node_id, other.node_id);
    }

    #[tokio::test]
    async fn test_poll_once_runs_full_cycle() {
        let (tasks, nodes, url) = spawn_platform().await;
        let agent = test_agent(url);

        let task = tasks
            .create(
                TaskType::Inference,
                "gpt-x".to_string(),
                "hello".to_string(),
                serde_json::Value::Null,
            )
            .await;

        agent.poll_once().await.expect("cycle should succeed");

        // The heartbeat registered the node
        assert!(nodes.exists(agent.node_id()));

        // The task went pending -> running -> completed with a result
        let stored = tasks.get(&task.id).unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.node_id.as_ref(), Some(agent.node_id()));
        assert!(stored.result.unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn test_poll_once_with_no_work_only_heartbeats() {
        let (tasks, nodes, url) = spawn_platform().await;
        let agent = test_agent(url);

        agent.poll_once().await.expect("cycle should succeed");

        assert!(nodes.exists(agent.node_id()));
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_platform_is_an_error_not_a_panic() {
        // Nothing listens here
        let agent = test_agent("http://127.0.0.1:9".to_string());

        let err = agent.poll_once().await.unwrap_err();
        assert!(format!("{:#}", err).contains("unreachable"));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let (_tasks, _nodes, url) = spawn_platform().await;
        let agent = test_agent(url);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        shutdown_tx.send(true).unwrap();

        // With the signal already raised the loop exits after one cycle
        tokio::time::timeout(Duration::from_secs(5), agent.run(shutdown_rx))
            .await
            .expect("run should stop promptly");
    }
}
