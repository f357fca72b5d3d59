//! Undirected broadcast graph.
//!
//! Neighbor lists are ordered sets: duplicates are dropped and the first
//! insertion decides the position. Search order over the graph, and with it
//! every routing decision, follows this order.

use std::collections::BTreeMap;

use crate::{Node, NodeId, NodeRole, Result, TopologyError};

/// A validated network: nodes with roles and capacities, plus adjacency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    provider: NodeId,
    nodes: BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Topology {
    /// Start building a topology.
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::default()
    }

    /// The single content provider.
    pub fn provider(&self) -> NodeId {
        self.provider
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Per-slice capacity of a node.
    pub fn capacity(&self, id: NodeId) -> Option<u32> {
        self.nodes.get(&id).map(|n| n.capacity)
    }

    /// Role of a node.
    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.nodes.get(&id).map(|n| n.role)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Neighbors of a node in insertion order. Unknown nodes have none.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if two nodes share a link.
    pub fn are_neighbors(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Client node ids in id order.
    pub fn clients(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.with_role(NodeRole::Client)
    }

    /// Router node ids in id order.
    pub fn routers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.with_role(NodeRole::Router)
    }

    fn with_role(&self, role: NodeRole) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .values()
            .filter(move |n| n.role == role)
            .map(|n| n.id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected links.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// Incremental topology construction. Validation happens in [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
}

impl TopologyBuilder {
    /// Declare a node with an explicit role.
    pub fn node(mut self, id: NodeId, capacity: u32, role: NodeRole) -> Self {
        self.nodes.push(Node::new(id, capacity, role));
        self
    }

    /// Declare the provider.
    pub fn provider(self, id: NodeId, capacity: u32) -> Self {
        self.node(id, capacity, NodeRole::Provider)
    }

    /// Declare a pass-through router.
    pub fn router(self, id: NodeId, capacity: u32) -> Self {
        self.node(id, capacity, NodeRole::Router)
    }

    /// Declare a client node.
    pub fn client(self, id: NodeId, capacity: u32) -> Self {
        self.node(id, capacity, NodeRole::Client)
    }

    /// Add an undirected link. Repeated links are collapsed.
    pub fn edge(mut self, a: NodeId, b: NodeId) -> Self {
        self.edges.push((a, b));
        self
    }

    /// Validate and freeze the topology.
    pub fn build(self) -> Result<Topology> {
        let mut provider = None;
        let mut nodes = BTreeMap::new();

        for node in self.nodes {
            if node.role.is_provider() {
                if let Some(first) = provider {
                    return Err(TopologyError::MultipleProviders {
                        first,
                        second: node.id,
                    });
                }
                provider = Some(node.id);
            }
            if nodes.insert(node.id, node).is_some() {
                return Err(TopologyError::DuplicateNode(node.id));
            }
        }

        let provider = provider.ok_or(TopologyError::NoProvider)?;

        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> =
            nodes.keys().map(|&id| (id, Vec::new())).collect();

        for (from, to) in self.edges {
            if from == to {
                return Err(TopologyError::SelfLoop(from));
            }
            for missing in [from, to] {
                if !nodes.contains_key(&missing) {
                    return Err(TopologyError::UnknownEndpoint { from, to, missing });
                }
            }
            link(&mut adjacency, from, to);
            link(&mut adjacency, to, from);
        }

        Ok(Topology {
            provider,
            nodes,
            adjacency,
        })
    }
}

fn link(adjacency: &mut BTreeMap<NodeId, Vec<NodeId>>, from: NodeId, to: NodeId) {
    let list = adjacency.entry(from).or_default();
    if !list.contains(&to) {
        list.push(to);
    }
}
