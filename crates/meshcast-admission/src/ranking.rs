//! Admission order.
//!
//! Clients with the tightest tolerance have the fewest routing options, so
//! they go first while the network is still empty. Among equally tight
//! clients the higher payer goes first; node id settles the rest so the
//! order is total.
//!
//! The ranking is a snapshot: it is computed once and never reacts to
//! admission results.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

use meshcast_topology::{Baseline, NodeId};

use crate::Client;

/// A client with its position in the admission order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedClient {
    /// Position in the order, 0 is served first
    pub rank: u32,
    pub client: Client,
    /// Unconstrained hop count from the provider
    pub baseline: Option<u32>,
    /// `alpha × baseline`, infinite when unreachable
    pub tolerance: f64,
}

/// Ascending tolerance, then descending payment, then ascending id.
pub fn admission_order(a: &RankedClient, b: &RankedClient) -> Ordering {
    a.tolerance
        .total_cmp(&b.tolerance)
        .then_with(|| b.client.payment.cmp(&a.client.payment))
        .then_with(|| a.client.id.cmp(&b.client.id))
}

/// Single-pass queue of clients in admission order.
#[derive(Debug, Clone)]
pub struct PriorityRanking {
    queue: VecDeque<RankedClient>,
}

impl PriorityRanking {
    /// Rank clients against their baseline distances.
    pub fn new(clients: &[Client], baseline: &Baseline) -> Self {
        let mut ranked: Vec<_> = clients
            .iter()
            .map(|client| {
                let distance = baseline.distance(client.id);
                RankedClient {
                    rank: 0,
                    client: client.clone(),
                    baseline: distance,
                    tolerance: client.tolerance(distance),
                }
            })
            .collect();

        ranked.sort_by(admission_order);
        for (rank, entry) in ranked.iter_mut().enumerate() {
            entry.rank = rank as u32;
        }

        Self {
            queue: ranked.into(),
        }
    }

    /// Clients not yet taken.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Rank of every remaining client.
    pub fn priorities(&self) -> BTreeMap<NodeId, u32> {
        self.queue.iter().map(|r| (r.client.id, r.rank)).collect()
    }
}

impl Iterator for PriorityRanking {
    type Item = RankedClient;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl ExactSizeIterator for PriorityRanking {}
