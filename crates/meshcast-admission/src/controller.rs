//! Greedy admission loop.
//!
//! Clients are taken once, in rank order. Each gets one search against the
//! ledger as earlier admissions left it. A rejected client is never
//! retried, even if a different order would have fit it.

use std::collections::{BTreeMap, HashSet};

use meshcast_topology::{Baseline, NodeRole, Topology};
use tracing::{info, warn};

use crate::{
    Admission, CapacityModel, Client, Error, PathFinder, PriorityRanking, Result, RunReport,
    Search, SearchConfig,
};

/// Drives ranking, search and commit for one topology.
#[derive(Debug, Clone)]
pub struct AdmissionController<'a> {
    topology: &'a Topology,
    baseline: Baseline,
    config: SearchConfig,
}

impl<'a> AdmissionController<'a> {
    /// Controller with baseline distances computed from the topology.
    pub fn new(topology: &'a Topology) -> Self {
        Self {
            topology,
            baseline: Baseline::compute(topology),
            config: SearchConfig::default(),
        }
    }

    /// Use externally supplied baseline distances.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Admit `clients` greedily, committing into `capacity`.
    ///
    /// Every client receives a priority. Only admitted clients receive a
    /// path. Fails without touching `capacity` if a client record is
    /// invalid; fails mid-run if the ledger turns out to be corrupt.
    pub fn run(&self, clients: &[Client], capacity: &mut CapacityModel) -> Result<Admission> {
        self.validate(clients)?;

        let ranking = PriorityRanking::new(clients, &self.baseline);
        let finder = PathFinder::new(self.topology).with_config(self.config);
        let mut admission = Admission {
            paths: BTreeMap::new(),
            priorities: ranking.priorities(),
            report: RunReport::default(),
        };

        info!(clients = ranking.len(), "admission run started");

        for entry in ranking {
            let id = entry.client.id;
            let upstream = self.baseline.clients_on_path(self.topology, id);
            match finder.find(id, entry.tolerance, capacity) {
                Ok(Search::Found(path)) => {
                    info!(
                        client = %id,
                        rank = entry.rank,
                        hops = path.hop_count(),
                        payment = entry.client.payment,
                        upstream,
                        "client admitted"
                    );
                    admission.report.record_admitted(&entry, &path, upstream);
                    admission.paths.insert(id, path);
                }
                Ok(Search::Rejected(reason)) => {
                    info!(client = %id, rank = entry.rank, %reason, upstream, "client rejected");
                    admission.report.record_rejected(&entry, reason, upstream);
                }
                Err(e) => {
                    warn!(client = %id, error = %e, "aborting admission run");
                    return Err(e);
                }
            }
        }

        info!(
            admitted = admission.report.admitted.len(),
            rejected = admission.report.rejected.len(),
            revenue = admission.report.revenue,
            "admission run finished"
        );
        Ok(admission)
    }

    fn validate(&self, clients: &[Client]) -> Result<()> {
        let mut seen = HashSet::new();
        for client in clients {
            client.validate()?;
            if !seen.insert(client.id) {
                return Err(Error::DuplicateClient(client.id));
            }
            match self.topology.role(client.id) {
                None => return Err(Error::UnknownNode(client.id)),
                Some(NodeRole::Provider) => return Err(Error::InvalidTarget(client.id)),
                Some(NodeRole::Router) => return Err(Error::NotAClient(client.id)),
                Some(NodeRole::Client) => {}
            }
        }
        Ok(())
    }
}
