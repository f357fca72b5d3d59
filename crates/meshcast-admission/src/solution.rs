//! Admission results and the serializable solution.

use std::collections::BTreeMap;

use meshcast_topology::NodeId;
use serde::{Deserialize, Serialize};

use crate::{CapacityModel, Path, RankedClient, Rejection};

/// Everything an admission run decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// Committed path per admitted client
    pub paths: BTreeMap<NodeId, Path>,
    /// Rank of every client, admitted or not
    pub priorities: BTreeMap<NodeId, u32>,
    pub report: RunReport,
}

impl Admission {
    pub fn is_admitted(&self, client: NodeId) -> bool {
        self.paths.contains_key(&client)
    }

    /// Package the run for serialization, echoing the capacity table.
    pub fn solution(&self, capacity: &CapacityModel) -> Solution {
        Solution {
            paths: self
                .paths
                .iter()
                .map(|(&id, path)| (id, path.nodes()))
                .collect(),
            priorities: self.priorities.clone(),
            capacities: capacity.capacities().clone(),
        }
    }
}

/// Output container: node-id paths, ranks and the capacity table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub paths: BTreeMap<NodeId, Vec<NodeId>>,
    pub priorities: BTreeMap<NodeId, u32>,
    pub capacities: BTreeMap<NodeId, u32>,
}

/// Per-client decisions in processing order, plus the revenue earned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub admitted: Vec<AdmittedClient>,
    pub rejected: Vec<RejectedClient>,
    /// Sum of payments of admitted clients
    pub revenue: u64,
}

impl RunReport {
    pub(crate) fn record_admitted(
        &mut self,
        entry: &RankedClient,
        path: &Path,
        clients_on_path: usize,
    ) {
        self.revenue += entry.client.payment;
        self.admitted.push(AdmittedClient {
            client: entry.client.id,
            rank: entry.rank,
            hops: path.hop_count(),
            baseline: entry.baseline,
            clients_on_path,
            payment: entry.client.payment,
        });
    }

    pub(crate) fn record_rejected(
        &mut self,
        entry: &RankedClient,
        reason: Rejection,
        clients_on_path: usize,
    ) {
        self.rejected.push(RejectedClient {
            client: entry.client.id,
            rank: entry.rank,
            clients_on_path,
            reason,
        });
    }

    /// Share of clients admitted, 0.0 for an empty run.
    pub fn admission_rate(&self) -> f64 {
        let total = self.admitted.len() + self.rejected.len();
        if total == 0 {
            return 0.0;
        }
        self.admitted.len() as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmittedClient {
    pub client: NodeId,
    pub rank: u32,
    /// Length of the committed path
    pub hops: u32,
    /// Unconstrained distance, for comparison with `hops`
    pub baseline: Option<u32>,
    /// Clients upstream on the baseline path
    pub clients_on_path: usize,
    pub payment: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedClient {
    pub client: NodeId,
    pub rank: u32,
    /// Clients upstream on the baseline path
    pub clients_on_path: usize,
    #[serde(flatten)]
    pub reason: Rejection,
}
