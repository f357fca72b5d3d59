//! Capacity-constrained path search over (node, time-slice) pairs.
//!
//! The frontier starts at the provider in slice 0. Expanding an entry at
//! slice `t` tries each neighbor in slice `t + 1`: a neighbor with capacity
//! left there is speculatively reserved and enqueued, a saturated one is
//! skipped but stays unreached, so a longer route may still pick it up in a
//! later slice.
//!
//! The search either commits exactly the reservations on the winning path or
//! leaves the ledger as it found it.

use std::collections::{HashMap, VecDeque};

use meshcast_topology::{NodeId, Topology};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CapacityModel, Error, InvalidPath, Reservations, Result, SearchConfig, Slice};

/// Why a client was not admitted. Neither case aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// No capacity-feasible path exists.
    Unreachable,
    /// A path exists but is longer than the client accepts.
    ToleranceExceeded { hops: u32, tolerance: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::ToleranceExceeded { hops, tolerance } => {
                write!(f, "{} hops exceed tolerance {}", hops, tolerance)
            }
        }
    }
}

/// One node of a path and the slice it forwards in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub node: NodeId,
    pub slice: Slice,
}

/// A route from the provider to a client, one hop per slice.
///
/// Never empty, and slices never go down along the hops. Deserialization
/// enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    hops: Vec<Hop>,
}

#[derive(Deserialize)]
struct RawPath {
    hops: Vec<Hop>,
}

impl TryFrom<RawPath> for Path {
    type Error = InvalidPath;

    fn try_from(raw: RawPath) -> std::result::Result<Self, InvalidPath> {
        if raw.hops.is_empty() {
            return Err(InvalidPath::Empty);
        }
        for pair in raw.hops.windows(2) {
            if pair[1].slice < pair[0].slice {
                return Err(InvalidPath::SliceRegression {
                    node: pair[1].node,
                    slice: pair[1].slice,
                    previous: pair[0].slice,
                });
            }
        }
        Ok(Self { hops: raw.hops })
    }
}

impl Path {
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Number of links traversed.
    pub fn hop_count(&self) -> u32 {
        (self.hops.len() - 1) as u32
    }

    pub fn source(&self) -> NodeId {
        self.hops[0].node
    }

    pub fn target(&self) -> NodeId {
        self.hops[self.hops.len() - 1].node
    }

    /// Node ids from provider to client.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.hops.iter().map(|h| h.node).collect()
    }

    /// Whether the path holds `node` in `slice`.
    pub fn occupies(&self, node: NodeId, slice: Slice) -> bool {
        self.hops.iter().any(|h| h.node == node && h.slice == slice)
    }
}

/// Outcome of a single search.
#[derive(Debug, Clone, PartialEq)]
pub enum Search {
    /// Path found and its reservations committed.
    Found(Path),
    /// Nothing committed.
    Rejected(Rejection),
}

/// Breadth-first search that respects per-slice capacity.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    topology: &'a Topology,
    config: SearchConfig,
}

impl<'a> PathFinder<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self {
            topology,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Route the provider to `target` within `tolerance` hops.
    ///
    /// On [`Search::Found`] the path's reservations are committed to
    /// `capacity`. On [`Search::Rejected`] the ledger is unchanged.
    /// `Err` means the ledger is corrupt.
    pub fn find(
        &self,
        target: NodeId,
        tolerance: f64,
        capacity: &mut CapacityModel,
    ) -> Result<Search> {
        if target == self.topology.provider() {
            return Err(Error::InvalidTarget(target));
        }
        if !self.topology.contains(target) {
            return Err(Error::UnknownNode(target));
        }

        let mut journal = capacity.begin();
        let Some(path) = self.expand(target, capacity, &mut journal)? else {
            debug!(%target, touched = journal.len(), "no capacity-feasible path");
            capacity.rollback(journal)?;
            return Ok(Search::Rejected(Rejection::Unreachable));
        };

        let hops = path.hop_count();
        if f64::from(hops) > tolerance {
            debug!(%target, hops, tolerance, "path exceeds tolerance");
            capacity.rollback(journal)?;
            return Ok(Search::Rejected(Rejection::ToleranceExceeded { hops, tolerance }));
        }

        debug!(
            %target,
            hops,
            released = journal.len() - hops as usize,
            "committing path"
        );
        capacity.commit(journal, |node, slice| path.occupies(node, slice))?;
        Ok(Search::Found(path))
    }

    fn expand(
        &self,
        target: NodeId,
        capacity: &mut CapacityModel,
        journal: &mut Reservations,
    ) -> Result<Option<Path>> {
        let provider = self.topology.provider();
        // node -> (predecessor, slice it was reached in)
        let mut reached = HashMap::from([(provider, (None, Slice::ORIGIN))]);
        let mut frontier = VecDeque::from([(provider, Slice::ORIGIN)]);

        while let Some((curr, slice)) = frontier.pop_front() {
            let next = slice.next();
            if !self.config.allows(next.value()) {
                continue;
            }

            for &adj in self.topology.neighbors(curr) {
                if reached.contains_key(&adj) || capacity.probe(adj, next)? == 0 {
                    continue;
                }
                capacity.reserve_speculative(journal, adj, next)?;
                reached.insert(adj, (Some(curr), next));

                if adj == target {
                    return Ok(Some(trace_back(&reached, target)));
                }
                frontier.push_back((adj, next));
            }
        }

        Ok(None)
    }
}

fn trace_back(reached: &HashMap<NodeId, (Option<NodeId>, Slice)>, target: NodeId) -> Path {
    let mut hops = Vec::new();
    let mut curr = Some(target);
    while let Some(node) = curr {
        let (predecessor, slice) = reached[&node];
        hops.push(Hop { node, slice });
        curr = predecessor;
    }
    hops.reverse();
    Path { hops }
}
