use serde::{Deserialize, Serialize};

/// Stable worker identity, supplied by the node itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    /// Generates a short random identifier for agents that were not
    /// configured with one.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("node-{}", &uuid[..8]))
    }
}

/// Reported liveness state of a node.
///
/// Heartbeats carry the node's own claim; the stale sweep overrides it to
/// `Offline` when heartbeats stop arriving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
}

/// Reputation assigned to every node on first registration. A hook for
/// future trust scoring; never mutated today.
pub const BASELINE_REPUTATION: f64 = 100.0;

/// A worker identity reporting heartbeats and capabilities.
///
/// `gpu_model` and `gpu_memory` are static capability descriptors written
/// once on first heartbeat; later heartbeats only refresh `status` and
/// `last_heartbeat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub gpu_model: String,
    pub gpu_memory: u64,
    pub status: NodeStatus,
    pub reputation_score: f64,
    /// Timestamp (ms) of the most recent heartbeat.
    pub last_heartbeat: u64,
}
