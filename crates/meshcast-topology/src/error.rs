//! Error types for meshcast-topology.

use thiserror::Error;

use crate::NodeId;

/// Result type for topology construction.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors raised while assembling a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// No provider was declared.
    #[error("topology has no provider")]
    NoProvider,

    /// More than one provider was declared.
    #[error("second provider {second} declared, {first} is already the provider")]
    MultipleProviders { first: NodeId, second: NodeId },

    /// The same node id was declared twice.
    #[error("node {0} declared twice")]
    DuplicateNode(NodeId),

    /// An edge endpoint is not a declared node.
    #[error("edge {from} - {to} references undeclared node {missing}")]
    UnknownEndpoint {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// A node links to itself.
    #[error("self loop at node {0}")]
    SelfLoop(NodeId),
}
