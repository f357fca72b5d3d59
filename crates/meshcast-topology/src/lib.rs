//! Meshcast Network Topology
//!
//! The fixed network a content provider broadcasts over.
//!
//! # Model
//!
//! Every node carries a transmission capacity (units it can forward per
//! time-slice) and exactly one role:
//! - **Provider**: the single source of the broadcast
//! - **Router**: pass-through node, capacity but no payment
//! - **Client**: paying receiver with a delay tolerance
//!
//! Links are undirected. Neighbor lists keep insertion order so that every
//! traversal over the graph is deterministic.
//!
//! # Baseline
//!
//! [`Baseline`] is the unconstrained breadth-first tree rooted at the
//! provider. It ignores capacity entirely and only exists to give each client
//! a reference hop count from which its latency budget is derived.

mod baseline;
mod error;
mod graph;
mod node;

pub use baseline::Baseline;
pub use error::{Result, TopologyError};
pub use graph::{Topology, TopologyBuilder};
pub use node::{Node, NodeId, NodeRole};

/// Capacity used for nodes that should never be the bottleneck.
pub const UNBOUNDED_CAPACITY: u32 = u32::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_topology_end_to_end() {
        let topology = Topology::builder()
            .provider(NodeId(0), UNBOUNDED_CAPACITY)
            .router(NodeId(1), 1)
            .client(NodeId(2), 1)
            .edge(NodeId(0), NodeId(1))
            .edge(NodeId(1), NodeId(2))
            .build()
            .unwrap();

        let baseline = Baseline::compute(&topology);
        assert_eq!(baseline.distance(NodeId(2)), Some(2));
        assert_eq!(
            baseline.path(NodeId(2)),
            Some(vec![NodeId(0), NodeId(1), NodeId(2)])
        );
    }
}
