//! JSON problem files.
//!
//! ```json
//! {
//!   "provider": 0,
//!   "graph": { "0": [1], "1": [0, 2], "2": [1] },
//!   "capacities": [4294967295, 1, 1],
//!   "clients": [ { "id": 2, "payment": 10, "alpha": 2.0 } ]
//! }
//! ```
//!
//! Node ids are indices into `capacities`. Listed clients get the client
//! role, every other node except the provider is a router. An optional
//! `baseline` map replaces the computed BFS distances.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use meshcast_admission::Client;
use meshcast_topology::{Baseline, NodeId, NodeRole, Topology};
use serde::{Deserialize, Serialize};

use crate::Result;

/// One admission problem as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub provider: NodeId,
    /// Adjacency lists. Links are undirected; listing one side is enough.
    pub graph: BTreeMap<NodeId, Vec<NodeId>>,
    /// Per-node capacity, indexed by node id
    #[serde(alias = "bandwidths")]
    pub capacities: Vec<u32>,
    pub clients: Vec<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BTreeMap<NodeId, u32>>,
}

impl Problem {
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build the validated network.
    pub fn topology(&self) -> Result<Topology> {
        let clients: BTreeSet<NodeId> = self.clients.iter().map(|c| c.id).collect();
        let mut builder = Topology::builder();

        for (index, &capacity) in self.capacities.iter().enumerate() {
            let id = NodeId(index as u32);
            let role = if id == self.provider {
                NodeRole::Provider
            } else if clients.contains(&id) {
                NodeRole::Client
            } else {
                NodeRole::Router
            };
            builder = builder.node(id, capacity, role);
        }

        for (&from, neighbors) in &self.graph {
            for &to in neighbors {
                builder = builder.edge(from, to);
            }
        }

        Ok(builder.build()?)
    }

    /// Supplied distances if present, otherwise BFS over `topology`.
    pub fn baseline(&self, topology: &Topology) -> Baseline {
        match &self.baseline {
            Some(distances) => Baseline::from_distances(
                topology.provider(),
                distances.iter().map(|(&id, &hops)| (id, hops)),
            ),
            None => Baseline::compute(topology),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use meshcast_topology::TopologyError;
    use std::io::Write;

    const CHAIN: &str = r#"{
        "provider": 0,
        "graph": { "0": [1], "1": [2] },
        "bandwidths": [4294967295, 1, 1],
        "clients": [ { "id": 2, "payment": 10, "alpha": 2.0 } ]
    }"#;

    #[test]
    fn parses_and_builds_chain() {
        let problem = Problem::from_reader(CHAIN.as_bytes()).unwrap();
        assert_eq!(problem.capacities, vec![u32::MAX, 1, 1]);

        let topology = problem.topology().unwrap();
        assert_eq!(topology.provider(), NodeId(0));
        assert_eq!(topology.role(NodeId(1)), Some(NodeRole::Router));
        assert_eq!(topology.role(NodeId(2)), Some(NodeRole::Client));
        assert!(topology.are_neighbors(NodeId(2), NodeId(1)));
        assert_eq!(topology.edge_count(), 2);

        let baseline = problem.baseline(&topology);
        assert_eq!(baseline.distance(NodeId(2)), Some(2));
        assert_eq!(
            baseline.path(NodeId(2)),
            Some(vec![NodeId(0), NodeId(1), NodeId(2)])
        );
    }

    #[test]
    fn supplied_baseline_wins() {
        let mut problem = Problem::from_reader(CHAIN.as_bytes()).unwrap();
        problem.baseline = Some(BTreeMap::from([(NodeId(2), 5)]));

        let topology = problem.topology().unwrap();
        let baseline = problem.baseline(&topology);
        assert_eq!(baseline.distance(NodeId(2)), Some(5));
        assert_eq!(baseline.distance(NodeId(0)), Some(0));
        assert_eq!(baseline.distance(NodeId(1)), None);
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CHAIN.as_bytes()).unwrap();

        let problem = Problem::from_path(file.path()).unwrap();
        assert_eq!(problem.clients.len(), 1);
        assert_eq!(problem.clients[0].id, NodeId(2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Problem::from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn malformed_json_rejected() {
        let result = Problem::from_reader(r#"{ "provider": 0 "#.as_bytes());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn edge_to_undeclared_node_rejected() {
        let mut problem = Problem::from_reader(CHAIN.as_bytes()).unwrap();
        problem.graph.insert(NodeId(2), vec![NodeId(7)]);
        assert!(matches!(
            problem.topology(),
            Err(Error::Topology(TopologyError::UnknownEndpoint { .. }))
        ));
    }

    #[test]
    fn provider_outside_capacity_table_rejected() {
        let mut problem = Problem::from_reader(CHAIN.as_bytes()).unwrap();
        problem.provider = NodeId(9);
        assert!(matches!(
            problem.topology(),
            Err(Error::Topology(TopologyError::NoProvider))
        ));
    }
}
