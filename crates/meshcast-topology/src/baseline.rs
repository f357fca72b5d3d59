//! Unconstrained breadth-first distances from the provider.
//!
//! Capacity plays no part here. The hop counts are the reference each
//! client's delay tolerance is scaled from.

use std::collections::{HashMap, VecDeque};

use crate::{NodeId, Topology};

/// Breadth-first tree rooted at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    root: NodeId,
    distance: HashMap<NodeId, u32>,
    parent: HashMap<NodeId, NodeId>,
}

impl Baseline {
    /// Run BFS from the topology's provider, visiting neighbors in order.
    pub fn compute(topology: &Topology) -> Self {
        let root = topology.provider();
        let mut distance = HashMap::from([(root, 0)]);
        let mut parent = HashMap::new();
        let mut queue = VecDeque::from([root]);

        while let Some(curr) = queue.pop_front() {
            let next = distance[&curr] + 1;
            for &adj in topology.neighbors(curr) {
                if distance.contains_key(&adj) {
                    continue;
                }
                distance.insert(adj, next);
                parent.insert(adj, curr);
                queue.push_back(adj);
            }
        }

        Self {
            root,
            distance,
            parent,
        }
    }

    /// Build from precomputed hop counts, without paths.
    ///
    /// Useful when distances come from an external source.
    pub fn from_distances(root: NodeId, distances: impl IntoIterator<Item = (NodeId, u32)>) -> Self {
        let mut distance: HashMap<_, _> = distances.into_iter().collect();
        distance.insert(root, 0);
        Self {
            root,
            distance,
            parent: HashMap::new(),
        }
    }

    /// Hop count from the provider, `None` if unreachable.
    pub fn distance(&self, id: NodeId) -> Option<u32> {
        self.distance.get(&id).copied()
    }

    /// Tree path from the provider to `id`, both ends included.
    pub fn path(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.distance.get(&id)?;
        let mut path = vec![id];
        let mut curr = id;
        while curr != self.root {
            curr = *self.parent.get(&curr)?;
            path.push(curr);
        }
        path.reverse();
        Some(path)
    }

    /// Number of clients strictly upstream of `id` on its tree path.
    ///
    /// A rough congestion hint: every such client competes for the same
    /// forwarding capacity.
    pub fn clients_on_path(&self, topology: &Topology, id: NodeId) -> usize {
        let Some(path) = self.path(id) else {
            return 0;
        };
        path[..path.len() - 1]
            .iter()
            .filter(|&&n| topology.role(n).is_some_and(|r| r.is_client()))
            .count()
    }

    /// Number of nodes reachable from the provider, the provider included.
    pub fn reachable_count(&self) -> usize {
        self.distance.len()
    }
}
