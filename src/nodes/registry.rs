//! In-Memory Node Registry
//!
//! Heartbeat upserts go through the `DashMap` entry API, which gives the
//! create-vs-update branch per-node atomicity while heartbeats from
//! different nodes proceed fully in parallel.

use super::types::*;
use crate::tasks::types::now_ms;

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// A node is considered stale after three missed heartbeats at the default
/// 10 second interval.
pub const DEFAULT_STALE_TIMEOUT: Duration = Duration::from_secs(30);

const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// The single owner of all node liveness records.
pub struct NodeRegistry {
    nodes: DashMap<NodeId, Node>,
}

impl NodeRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            nodes: DashMap::new(),
        })
    }

    /// Records a heartbeat, registering the node if it is unseen.
    ///
    /// A first heartbeat creates the record with baseline reputation and the
    /// supplied capability descriptors. Later heartbeats update only
    /// `status` and `last_heartbeat`; capability fields are never
    /// re-validated against the original registration.
    pub fn upsert_heartbeat(
        &self,
        node_id: &NodeId,
        gpu_model: &str,
        gpu_memory: u64,
        status: NodeStatus,
    ) -> Node {
        let mut entry = self.nodes.entry(node_id.clone()).or_insert_with(|| {
            tracing::info!("Registered new node {} ({})", node_id.0, gpu_model);
            Node {
                id: node_id.clone(),
                gpu_model: gpu_model.to_string(),
                gpu_memory,
                status,
                reputation_score: BASELINE_REPUTATION,
                last_heartbeat: 0,
            }
        });

        entry.status = status;
        entry.last_heartbeat = now_ms();

        entry.clone()
    }

    /// Used to reject task pulls from nodes that never heartbeated.
    pub fn exists(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<Node> {
        self.nodes.get(node_id).map(|entry| entry.clone())
    }

    /// Full-scan tally of (total, online) for the stats endpoint.
    pub fn counts(&self) -> (usize, usize) {
        let total = self.nodes.len();
        let online = self
            .nodes
            .iter()
            .filter(|entry| entry.status == NodeStatus::Online)
            .count();

        (total, online)
    }

    /// Marks `Online` nodes whose last heartbeat is older than `timeout` as
    /// `Offline`. Returns how many nodes flipped.
    ///
    /// A later heartbeat from a swept node brings it back `Online` through
    /// the normal upsert path.
    pub fn sweep_stale(&self, timeout: Duration) -> usize {
        let cutoff = now_ms().saturating_sub(timeout.as_millis() as u64);
        let mut swept = 0;

        for mut entry in self.nodes.iter_mut() {
            if entry.status == NodeStatus::Online && entry.last_heartbeat < cutoff {
                tracing::warn!(
                    "Node {} went stale (last heartbeat at {} ms)",
                    entry.id.0,
                    entry.last_heartbeat
                );
                entry.status = NodeStatus::Offline;
                swept += 1;
            }
        }

        swept
    }

    /// Spawns the background liveness sweep and returns immediately.
    pub fn spawn_stale_sweep(self: &Arc<Self>, timeout: Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);

            loop {
                interval.tick().await;

                let swept = registry.sweep_stale(timeout);
                if swept > 0 {
                    tracing::info!("Stale sweep marked {} node(s) offline", swept);
                }
            }
        })
    }
}
