//! Load outcomes and post-load verification

use crate::Error;
use crate::schema::Entity;
use crate::storage::TotalMismatch;

/// How one entity's batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Batch committed
    Loaded,
    /// No source file; nothing attempted
    Skipped,
    /// Batch rolled back
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Loaded => "loaded",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Failed => "failed",
        }
    }
}

/// Result of one unit of work in the load phase
#[derive(Debug)]
pub struct EntityOutcome {
    pub entity: Entity,
    pub inserted: usize,
    pub status: OutcomeStatus,
    pub error: Option<Error>,
}

impl EntityOutcome {
    pub fn loaded(entity: Entity, inserted: usize) -> Self {
        Self {
            entity,
            inserted,
            status: OutcomeStatus::Loaded,
            error: None,
        }
    }

    /// A contained failure; a missing source counts as skipped
    pub fn failed(entity: Entity, error: Error) -> Self {
        let status = match error {
            Error::SourceNotFound { .. } => OutcomeStatus::Skipped,
            _ => OutcomeStatus::Failed,
        };
        Self {
            entity,
            inserted: 0,
            status,
            error: Some(error),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status == OutcomeStatus::Loaded
    }
}

/// Everything the load phase did, in load order
#[derive(Debug, Default)]
pub struct LoadReport {
    pub outcomes: Vec<EntityOutcome>,
    /// Orders whose total disagrees with their items (warn/reject policies only)
    pub total_mismatches: Vec<TotalMismatch>,
}

impl LoadReport {
    pub fn push(&mut self, outcome: EntityOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcome(&self, entity: Entity) -> Option<&EntityOutcome> {
        self.outcomes.iter().find(|o| o.entity == entity)
    }

    pub fn inserted(&self, entity: Entity) -> usize {
        self.outcome(entity).map(|o| o.inserted).unwrap_or(0)
    }

    pub fn total_inserted(&self) -> usize {
        self.outcomes.iter().map(|o| o.inserted).sum()
    }

    /// Entities whose batch did not commit
    pub fn failures(&self) -> impl Iterator<Item = &EntityOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(EntityOutcome::is_loaded)
    }
}

/// A fatal error raised mid-run, with everything completed before it
#[derive(Debug, thiserror::Error)]
#[error("load aborted after {} entities: {error}", .report.outcomes.len())]
pub struct LoadAborted {
    pub report: LoadReport,
    #[source]
    pub error: Error,
}

/// Reported vs. counted rows for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCount {
    pub entity: Entity,
    pub reported: usize,
    pub actual: usize,
}

impl VerifiedCount {
    pub fn matches(&self) -> bool {
        self.reported == self.actual
    }
}

/// Recount of the store after a load
#[derive(Debug, Clone, Default)]
pub struct Verification {
    pub counts: Vec<VerifiedCount>,
    /// Rows whose foreign keys point at missing parents
    pub dangling_references: usize,
}

impl Verification {
    pub fn is_consistent(&self) -> bool {
        self.dangling_references == 0 && self.counts.iter().all(VerifiedCount::matches)
    }

    pub fn total_rows(&self) -> usize {
        self.counts.iter().map(|c| c.actual).sum()
    }
}
