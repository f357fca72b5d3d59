//! Node identifiers and roles.

/// Identifier of a node in the broadcast network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw identifier.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The part a node plays in the broadcast. A node is exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeRole {
    /// Origin of the content
    Provider,
    /// Forwards content, never receives it for itself
    Router,
    /// Paying receiver
    Client,
}

impl NodeRole {
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider)
    }

    pub const fn is_router(&self) -> bool {
        matches!(self, Self::Router)
    }

    pub const fn is_client(&self) -> bool {
        matches!(self, Self::Client)
    }
}

/// A node with its per-slice transmission capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub capacity: u32,
    pub role: NodeRole,
}

impl Node {
    pub const fn new(id: NodeId, capacity: u32, role: NodeRole) -> Self {
        Self { id, capacity, role }
    }
}
