use gpu_fabric::agent::executor::SimulatedExecutor;
use gpu_fabric::agent::{Agent, AgentConfig};
use gpu_fabric::nodes::registry::{NodeRegistry, DEFAULT_STALE_TIMEOUT};
use gpu_fabric::nodes::types::NodeId;
use gpu_fabric::platform::server;
use gpu_fabric::tasks::registry::TaskRegistry;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("platform") => run_platform(&args[2..]).await,
        Some("agent") => run_agent(&args[2..]).await,
        _ => {
            eprintln!("Usage: {} <platform|agent> [options]", args[0]);
            eprintln!();
            eprintln!("  platform --bind <addr:port>           (default 0.0.0.0:8080)");
            eprintln!("  agent    --platform <url>             (default http://localhost:8080)");
            eprintln!("           --node-id <id>               (default generated)");
            eprintln!("           --gpu-model <name>           (default Test-GPU)");
            eprintln!("           --gpu-memory <mb>            (default 8192)");
            eprintln!("           --interval <seconds>         (default 10)");

            std::process::exit(1);
        }
    }
}

async fn run_platform(args: &[String]) -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "0.0.0.0:8080".parse()?;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Starting platform on {}", bind_addr);

    let tasks = TaskRegistry::new();
    let nodes = NodeRegistry::new();

    nodes.spawn_stale_sweep(DEFAULT_STALE_TIMEOUT);

    server::serve(bind_addr, tasks, nodes).await
}

async fn run_agent(args: &[String]) -> anyhow::Result<()> {
    let mut config = AgentConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--platform" => {
                config.platform_url = args[i + 1].clone();
                i += 2;
            }
            "--node-id" => {
                config.node_id = NodeId(args[i + 1].clone());
                i += 2;
            }
            "--gpu-model" => {
                config.gpu_model = args[i + 1].clone();
                i += 2;
            }
            "--gpu-memory" => {
                config.gpu_memory = args[i + 1].parse()?;
                i += 2;
            }
            "--interval" => {
                config.heartbeat_interval = Duration::from_secs(args[i + 1].parse()?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let agent = Agent::new(config, Arc::new(SimulatedExecutor::default()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    agent.run(shutdown_rx).await;

    Ok(())
}
