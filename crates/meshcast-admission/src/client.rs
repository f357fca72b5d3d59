//! Paying clients and their delay tolerance.

use meshcast_topology::NodeId;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A client record: where it sits, what it pays, how patient it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Node the client sits on
    pub id: NodeId,
    /// Revenue earned if the client is admitted
    pub payment: u64,
    /// Tolerance multiplier over the unconstrained distance
    pub alpha: f64,
}

impl Client {
    pub fn new(id: NodeId, payment: u64, alpha: f64) -> Self {
        Self { id, payment, alpha }
    }

    /// Reject records whose alpha is negative or not a number.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() {
            return Err(Error::InvalidClient {
                id: self.id,
                reason: format!("alpha {} is not finite", self.alpha),
            });
        }
        if self.alpha < 0.0 {
            return Err(Error::InvalidClient {
                id: self.id,
                reason: format!("alpha {} is negative", self.alpha),
            });
        }
        Ok(())
    }

    /// Longest acceptable path, in hops: `alpha × baseline`.
    ///
    /// A client with no baseline distance cannot be reached at all and gets
    /// an infinite tolerance, which ranks it last.
    pub fn tolerance(&self, baseline: Option<u32>) -> f64 {
        match baseline {
            Some(hops) => {
                let tolerance = self.alpha * f64::from(hops);
                // fold -0.0 so equal tolerances compare equal under total_cmp
                if tolerance == 0.0 {
                    0.0
                } else {
                    tolerance
                }
            }
            None => f64::INFINITY,
        }
    }
}
