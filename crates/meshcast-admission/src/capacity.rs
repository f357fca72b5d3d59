//! Time-sliced capacity ledger.
//!
//! Each node can forward `capacity` units per time-slice. The ledger records
//! how many units are consumed at every (node, slice) pair that holds at
//! least one reservation; pairs that drop back to zero are removed, so two
//! ledgers with the same reservations compare equal.
//!
//! Reservations made during a search are journaled in [`Reservations`] and
//! either committed (partially kept) or rolled back as a whole.

use std::collections::BTreeMap;

use meshcast_topology::{NodeId, Topology};
use serde::{Deserialize, Serialize};

use crate::CapacityError;

type Result<T> = std::result::Result<T, CapacityError>;

/// A discrete propagation step. The provider transmits at slice 0 and each
/// hop lands one slice later.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Slice(pub u32);

impl Slice {
    /// The slice at which the provider transmits.
    pub const ORIGIN: Self = Self(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The following slice.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Remaining transmission capacity per node and time-slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityModel {
    capacity: BTreeMap<NodeId, u32>,
    consumed: BTreeMap<(NodeId, Slice), u32>,
}

impl CapacityModel {
    /// Create an empty ledger over the given per-node capacities.
    pub fn new(capacities: impl IntoIterator<Item = (NodeId, u32)>) -> Self {
        Self {
            capacity: capacities.into_iter().collect(),
            consumed: BTreeMap::new(),
        }
    }

    /// Create an empty ledger with the capacities declared in a topology.
    pub fn from_topology(topology: &Topology) -> Self {
        Self::new(topology.nodes().map(|n| (n.id, n.capacity)))
    }

    /// Per-slice capacity of a node.
    pub fn capacity(&self, node: NodeId) -> Result<u32> {
        self.capacity
            .get(&node)
            .copied()
            .ok_or(CapacityError::UnknownNode(node))
    }

    /// The full capacity table, in node order.
    pub fn capacities(&self) -> &BTreeMap<NodeId, u32> {
        &self.capacity
    }

    /// Units consumed at (node, slice).
    pub fn consumed(&self, node: NodeId, slice: Slice) -> u32 {
        self.consumed.get(&(node, slice)).copied().unwrap_or(0)
    }

    /// Units still available at (node, slice).
    pub fn probe(&self, node: NodeId, slice: Slice) -> Result<u32> {
        let capacity = self.capacity(node)?;
        let consumed = self.consumed(node, slice);
        capacity
            .checked_sub(consumed)
            .ok_or(CapacityError::Overcommitted {
                node,
                slice,
                consumed,
                capacity,
            })
    }

    /// Consume one unit at (node, slice).
    pub fn reserve(&mut self, node: NodeId, slice: Slice) -> Result<()> {
        if self.probe(node, slice)? == 0 {
            return Err(CapacityError::Exhausted { node, slice });
        }
        *self.consumed.entry((node, slice)).or_insert(0) += 1;
        Ok(())
    }

    /// Return one unit at (node, slice).
    pub fn release(&mut self, node: NodeId, slice: Slice) -> Result<()> {
        let key = (node, slice);
        let Some(units) = self.consumed.get_mut(&key) else {
            return Err(CapacityError::ReleaseWithoutReserve { node, slice });
        };
        *units -= 1;
        if *units == 0 {
            self.consumed.remove(&key);
        }
        Ok(())
    }

    /// Open an empty journal for one search attempt.
    pub fn begin(&self) -> Reservations {
        Reservations::default()
    }

    /// Reserve one unit and record it in a search journal.
    pub fn reserve_speculative(
        &mut self,
        journal: &mut Reservations,
        node: NodeId,
        slice: Slice,
    ) -> Result<()> {
        self.reserve(node, slice)?;
        journal.entries.push((node, slice));
        Ok(())
    }

    /// Undo every reservation in the journal, newest first.
    pub fn rollback(&mut self, journal: Reservations) -> Result<()> {
        for &(node, slice) in journal.entries.iter().rev() {
            self.release(node, slice)?;
        }
        Ok(())
    }

    /// Make the journaled reservations selected by `keep` permanent and
    /// release the rest.
    pub fn commit<F>(&mut self, journal: Reservations, keep: F) -> Result<()>
    where
        F: Fn(NodeId, Slice) -> bool,
    {
        for &(node, slice) in journal.entries.iter().rev() {
            if !keep(node, slice) {
                self.release(node, slice)?;
            }
        }
        Ok(())
    }

    /// Every (node, slice, units) with a non-zero consumption, in order.
    pub fn occupancy(&self) -> impl Iterator<Item = (NodeId, Slice, u32)> + '_ {
        self.consumed
            .iter()
            .map(|(&(node, slice), &units)| (node, slice, units))
    }

    /// Sum of consumed units across all nodes and slices.
    pub fn total_consumed(&self) -> u64 {
        self.consumed.values().map(|&u| u64::from(u)).sum()
    }

    /// Copy of the consumption table, for comparing ledger states.
    pub fn snapshot(&self) -> BTreeMap<(NodeId, Slice), u32> {
        self.consumed.clone()
    }

    /// True if nothing has been reserved.
    pub fn is_unconsumed(&self) -> bool {
        self.consumed.is_empty()
    }
}

/// Journal of the speculative reservations made by one search attempt.
#[derive(Debug, Default)]
#[must_use = "speculative reservations must be committed or rolled back"]
pub struct Reservations {
    entries: Vec<(NodeId, Slice)>,
}

impl Reservations {
    /// Number of journaled reservations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
