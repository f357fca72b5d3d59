//! Meshcast Admission Engine
//!
//! Decides which clients a provider can serve over a capacity-limited
//! network, and along which paths.
//!
//! # Model
//!
//! Time is cut into slices. The provider transmits in slice 0 and every hop
//! lands one slice later, so a node on a path is busy in exactly one slice.
//! Each node can forward `capacity` units per slice.
//!
//! # Admission
//!
//! 1. Rank clients by tolerance (`alpha × baseline distance`), tightest
//!    first, higher payment breaking ties
//! 2. For each client in turn, search a capacity-feasible path while
//!    speculatively reserving what the search touches
//! 3. Keep the reservations on the found path if it fits the tolerance,
//!    otherwise roll every one of them back
//!
//! The order is fixed up front and never revisited. This is a greedy
//! heuristic, not an optimal max-revenue assignment.
//!
//! # Example
//!
//! ```
//! use meshcast_admission::{AdmissionController, CapacityModel, Client};
//! use meshcast_topology::{NodeId, Topology, UNBOUNDED_CAPACITY};
//!
//! let topology = Topology::builder()
//!     .provider(NodeId(0), UNBOUNDED_CAPACITY)
//!     .router(NodeId(1), 1)
//!     .client(NodeId(2), 1)
//!     .edge(NodeId(0), NodeId(1))
//!     .edge(NodeId(1), NodeId(2))
//!     .build()
//!     .unwrap();
//!
//! let mut capacity = CapacityModel::from_topology(&topology);
//! let clients = [Client::new(NodeId(2), 10, 10.0)];
//! let admission = AdmissionController::new(&topology)
//!     .run(&clients, &mut capacity)
//!     .unwrap();
//!
//! assert_eq!(
//!     admission.paths[&NodeId(2)].nodes(),
//!     vec![NodeId(0), NodeId(1), NodeId(2)]
//! );
//! ```

mod capacity;
mod client;
mod config;
mod controller;
mod error;
mod ranking;
mod search;
mod solution;
mod verify;

pub use capacity::{CapacityModel, Reservations, Slice};
pub use client::Client;
pub use config::SearchConfig;
pub use controller::AdmissionController;
pub use error::{CapacityError, Error, InvalidPath, Result};
pub use ranking::{admission_order, PriorityRanking, RankedClient};
pub use search::{Hop, Path, PathFinder, Rejection, Search};
pub use solution::{Admission, AdmittedClient, RejectedClient, RunReport, Solution};
pub use verify::{verify, Violation};
