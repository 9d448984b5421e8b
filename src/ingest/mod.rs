//! Ingestion Loader
//!
//! Rebuilds the store and repopulates it table by table:
//! 1. Reset: drop children-first, create parents-first
//! 2. Load: one transaction per entity, in dependency order
//! 3. Verify: recount every table against the reported inserts
//!
//! A failing entity is rolled back and reported; the run moves on.

pub mod coerce;
pub mod loader;
pub mod report;

pub use loader::Loader;
pub use report::{EntityOutcome, LoadAborted, LoadReport, OutcomeStatus, Verification, VerifiedCount};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::Error;

/// Largest difference between a stored amount and its recomputed value
/// that still counts as equal.
pub const TOTALS_TOLERANCE: f64 = 0.005;

/// What to do with precomputed `subtotal` / `total_amount` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalsPolicy {
    /// Store upstream values as-is
    #[default]
    Trust,
    /// Store as-is, log every mismatch
    Warn,
    /// Fail the order item batch on a subtotal mismatch
    Reject,
}

impl TotalsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalsPolicy::Trust => "trust",
            TotalsPolicy::Warn => "warn",
            TotalsPolicy::Reject => "reject",
        }
    }
}

impl FromStr for TotalsPolicy {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "trust" => Ok(TotalsPolicy::Trust),
            "warn" => Ok(TotalsPolicy::Warn),
            "reject" => Ok(TotalsPolicy::Reject),
            _ => Err(Error::Config(format!("Unknown totals policy: {}", s))),
        }
    }
}

impl std::fmt::Display for TotalsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
