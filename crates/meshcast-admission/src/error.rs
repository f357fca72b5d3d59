//! Error types for meshcast-admission.
//!
//! Only fatal conditions live here. A client that cannot be served is not an
//! error, see [`Rejection`](crate::Rejection).

use meshcast_topology::{NodeId, TopologyError};
use thiserror::Error;

use crate::Slice;

/// Result type for admission operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Capacity ledger corruption. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// Reserve on a (node, slice) with nothing left.
    #[error("node {node} has no remaining capacity at slice {slice}")]
    Exhausted { node: NodeId, slice: Slice },

    /// Release on a (node, slice) that holds no reservation.
    #[error("release of node {node} at slice {slice} without a matching reserve")]
    ReleaseWithoutReserve { node: NodeId, slice: Slice },

    /// Consumption above capacity was observed.
    #[error("node {node} at slice {slice} holds {consumed} units, capacity is {capacity}")]
    Overcommitted {
        node: NodeId,
        slice: Slice,
        consumed: u32,
        capacity: u32,
    },

    /// The ledger has no capacity entry for this node.
    #[error("no capacity recorded for node {0}")]
    UnknownNode(NodeId),
}

/// Errors that abort an admission run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The capacity ledger is corrupt.
    #[error("capacity invariant violated: {0}")]
    Capacity(#[from] CapacityError),

    /// Invalid topology.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// A client or search target is not in the topology.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A client record points at a router or the provider.
    #[error("node {0} is not a client")]
    NotAClient(NodeId),

    /// Searching from the provider to itself.
    #[error("search target {0} is the provider")]
    InvalidTarget(NodeId),

    /// A client listed more than once.
    #[error("client {0} listed twice")]
    DuplicateClient(NodeId),

    /// A client record with unusable attributes.
    #[error("invalid client {id}: {reason}")]
    InvalidClient { id: NodeId, reason: String },
}

/// A decoded path that cannot describe a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPath {
    #[error("path has no hops")]
    Empty,

    #[error("slice {slice} at node {node} follows {previous}")]
    SliceRegression {
        node: NodeId,
        slice: Slice,
        previous: Slice,
    },
}
