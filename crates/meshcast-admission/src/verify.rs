//! Independent checks on a finished solution.
//!
//! Occupancy is recounted from the paths alone and compared both against
//! node capacity and against the ledger the run produced. A clean run has no
//! violations; any violation points at a bug in search or rollback.

use std::collections::{BTreeMap, BTreeSet};

use meshcast_topology::{NodeId, Topology};
use thiserror::Error;

use crate::{CapacityModel, Slice, Solution};

/// A broken solution invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A path was assigned to a router, the provider, or an unknown node.
    #[error("path assigned to non-client node {0}")]
    NotAClient(NodeId),

    /// An admitted client has no rank.
    #[error("admitted client {0} has no priority")]
    MissingPriority(NodeId),

    /// Two clients share a rank.
    #[error("rank {rank} assigned to both {first} and {second}")]
    DuplicateRank {
        rank: u32,
        first: NodeId,
        second: NodeId,
    },

    /// The path does not start at the provider.
    #[error("path of client {client} starts at {found:?}")]
    WrongSource {
        client: NodeId,
        found: Option<NodeId>,
    },

    /// The path does not end at its client.
    #[error("path of client {client} ends at {found:?}")]
    WrongTarget {
        client: NodeId,
        found: Option<NodeId>,
    },

    /// Two consecutive path nodes are not linked.
    #[error("path of client {client} uses missing link {from} - {to}")]
    MissingLink {
        client: NodeId,
        from: NodeId,
        to: NodeId,
    },

    /// More paths occupy a (node, slice) than it can carry.
    #[error("node {node} carries {occupied} paths at slice {slice}, capacity {capacity}")]
    OverCapacity {
        node: NodeId,
        slice: Slice,
        occupied: u32,
        capacity: u32,
    },

    /// The ledger disagrees with the paths.
    #[error("ledger holds {ledger} units at node {node} slice {slice}, paths occupy {occupied}")]
    LedgerMismatch {
        node: NodeId,
        slice: Slice,
        ledger: u32,
        occupied: u32,
    },
}

/// Check paths, ranks and capacity of a solution.
pub fn verify(
    solution: &Solution,
    topology: &Topology,
    capacity: &CapacityModel,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    check_priorities(solution, &mut violations);

    let mut occupied: BTreeMap<(NodeId, Slice), u32> = BTreeMap::new();
    for (&client, path) in &solution.paths {
        if !topology.role(client).is_some_and(|r| r.is_client()) {
            violations.push(Violation::NotAClient(client));
        }
        if path.first() != Some(&topology.provider()) {
            violations.push(Violation::WrongSource {
                client,
                found: path.first().copied(),
            });
        }
        if path.last() != Some(&client) {
            violations.push(Violation::WrongTarget {
                client,
                found: path.last().copied(),
            });
        }
        for pair in path.windows(2) {
            if !topology.are_neighbors(pair[0], pair[1]) {
                violations.push(Violation::MissingLink {
                    client,
                    from: pair[0],
                    to: pair[1],
                });
            }
        }
        // the provider transmits, it is never charged
        for (slice, &node) in path.iter().enumerate().skip(1) {
            *occupied.entry((node, Slice(slice as u32))).or_insert(0) += 1;
        }
    }

    for (&(node, slice), &count) in &occupied {
        let limit = topology.capacity(node).unwrap_or(0);
        if count > limit {
            violations.push(Violation::OverCapacity {
                node,
                slice,
                occupied: count,
                capacity: limit,
            });
        }
    }

    let ledger: BTreeMap<_, _> = capacity
        .occupancy()
        .map(|(node, slice, units)| ((node, slice), units))
        .collect();
    let keys: BTreeSet<_> = ledger.keys().chain(occupied.keys()).copied().collect();
    for (node, slice) in keys {
        let held = ledger.get(&(node, slice)).copied().unwrap_or(0);
        let count = occupied.get(&(node, slice)).copied().unwrap_or(0);
        if held != count {
            violations.push(Violation::LedgerMismatch {
                node,
                slice,
                ledger: held,
                occupied: count,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_priorities(solution: &Solution, violations: &mut Vec<Violation>) {
    for &client in solution.paths.keys() {
        if !solution.priorities.contains_key(&client) {
            violations.push(Violation::MissingPriority(client));
        }
    }

    let mut by_rank: BTreeMap<u32, NodeId> = BTreeMap::new();
    for (&client, &rank) in &solution.priorities {
        if let Some(&first) = by_rank.get(&rank) {
            violations.push(Violation::DuplicateRank {
                rank,
                first,
                second: client,
            });
        } else {
            by_rank.insert(rank, client);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcast_topology::UNBOUNDED_CAPACITY;

    fn topology() -> Topology {
        Topology::builder()
            .provider(NodeId(0), UNBOUNDED_CAPACITY)
            .router(NodeId(1), 1)
            .client(NodeId(2), 1)
            .client(NodeId(3), 1)
            .edge(NodeId(0), NodeId(1))
            .edge(NodeId(1), NodeId(2))
            .edge(NodeId(1), NodeId(3))
            .build()
            .unwrap()
    }

    fn admitted(t: &Topology) -> (Solution, CapacityModel) {
        let mut capacity = CapacityModel::from_topology(t);
        capacity.reserve(NodeId(1), Slice(1)).unwrap();
        capacity.reserve(NodeId(2), Slice(2)).unwrap();
        let solution = Solution {
            paths: BTreeMap::from([(NodeId(2), vec![NodeId(0), NodeId(1), NodeId(2)])]),
            priorities: BTreeMap::from([(NodeId(2), 0), (NodeId(3), 1)]),
            capacities: capacity.capacities().clone(),
        };
        (solution, capacity)
    }

    #[test]
    fn consistent_solution_passes() {
        let t = topology();
        let (solution, capacity) = admitted(&t);
        assert_eq!(verify(&solution, &t, &capacity), Ok(()));
    }

    #[test]
    fn empty_solution_passes() {
        let t = topology();
        let capacity = CapacityModel::from_topology(&t);
        assert_eq!(verify(&Solution::default(), &t, &capacity), Ok(()));
    }

    #[test]
    fn shared_router_over_capacity() {
        let t = topology();
        let (mut solution, _) = admitted(&t);
        solution
            .paths
            .insert(NodeId(3), vec![NodeId(0), NodeId(1), NodeId(3)]);
        // an unbounded ledger that agrees with the paths, so only the
        // capacity check fires
        let mut capacity = CapacityModel::new(t.nodes().map(|n| (n.id, UNBOUNDED_CAPACITY)));
        for (node, slice) in [(1, 1), (2, 2), (1, 1), (3, 2)] {
            capacity.reserve(NodeId(node), Slice(slice)).unwrap();
        }

        let violations = verify(&solution, &t, &capacity).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::OverCapacity {
                node: NodeId(1),
                slice: Slice(1),
                occupied: 2,
                capacity: 1
            }]
        );
    }

    #[test]
    fn malformed_paths_reported() {
        let t = topology();
        let capacity = CapacityModel::from_topology(&t);
        let solution = Solution {
            paths: BTreeMap::from([
                (NodeId(1), vec![NodeId(0), NodeId(1)]),
                (NodeId(3), vec![NodeId(2), NodeId(3)]),
            ]),
            priorities: BTreeMap::from([(NodeId(3), 0), (NodeId(2), 0)]),
            capacities: BTreeMap::new(),
        };

        let violations = verify(&solution, &t, &capacity).unwrap_err();
        assert!(violations.contains(&Violation::NotAClient(NodeId(1))));
        assert!(violations.contains(&Violation::MissingPriority(NodeId(1))));
        assert!(violations.contains(&Violation::DuplicateRank {
            rank: 0,
            first: NodeId(2),
            second: NodeId(3)
        }));
        assert!(violations.contains(&Violation::WrongSource {
            client: NodeId(3),
            found: Some(NodeId(2))
        }));
        assert!(violations.contains(&Violation::MissingLink {
            client: NodeId(3),
            from: NodeId(2),
            to: NodeId(3)
        }));
        assert!(violations.iter().any(|v| matches!(v, Violation::LedgerMismatch { .. })));
    }

    #[test]
    fn empty_path_has_no_endpoints() {
        let t = topology();
        let capacity = CapacityModel::from_topology(&t);
        let solution = Solution {
            paths: BTreeMap::from([(NodeId(2), vec![])]),
            priorities: BTreeMap::from([(NodeId(2), 0)]),
            capacities: BTreeMap::new(),
        };
        let violations = verify(&solution, &t, &capacity).unwrap_err();
        assert_eq!(
            violations,
            vec![
                Violation::WrongSource {
                    client: NodeId(2),
                    found: None
                },
                Violation::WrongTarget {
                    client: NodeId(2),
                    found: None
                },
            ]
        );
    }

    #[test]
    fn stale_ledger_detected() {
        let t = topology();
        let (solution, mut capacity) = admitted(&t);
        capacity.reserve(NodeId(3), Slice(2)).unwrap();
        assert_eq!(
            verify(&solution, &t, &capacity),
            Err(vec![Violation::LedgerMismatch {
                node: NodeId(3),
                slice: Slice(2),
                ledger: 1,
                occupied: 0
            }])
        );
    }
}
