//! Outcome of batch operations.
//!
//! Batch items are attempted independently: successes are committed even
//! when siblings fail, and every failure is reported back to the caller.

use serde::Serialize;
use tracing::warn;

use crate::error::{HerdError, HerdResult};
use crate::models::EntityRef;

/// One item of a batch that did not go through.
#[derive(Debug)]
pub struct BatchFailure {
    pub entity: EntityRef,
    pub error: HerdError,
}

/// Per-item outcome of a batch operation.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<EntityRef>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn record(&mut self, entity: EntityRef, outcome: HerdResult<()>) {
        match outcome {
            Ok(()) => self.succeeded.push(entity),
            Err(error) => {
                warn!(entity = %entity, error = %error, "batch item failed");
                self.failures.push(BatchFailure { entity, error });
            }
        }
    }

    pub fn fail(&mut self, entity: EntityRef, error: HerdError) {
        self.record(entity, Err(error));
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.succeeded.extend(other.succeeded);
        self.failures.extend(other.failures);
    }

    /// Summary suitable for logs and foreign callers.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            succeeded: self.succeeded.len(),
            failed: self.failures.len(),
            messages: self
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.entity, f.error))
                .collect(),
        }
    }

    /// Turn a report with failures into [`HerdError::Batch`].
    pub fn into_result(self) -> HerdResult<Vec<EntityRef>> {
        if self.failures.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(HerdError::Batch {
                attempted: self.attempted(),
                failures: self.failures,
            })
        }
    }
}

/// Serializable view of a [`BatchReport`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_summary() {
        let mut report = BatchReport::default();
        report.record(EntityRef::Calf("c1".into()), Ok(()));
        report.fail(
            EntityRef::Calf("c2".into()),
            HerdError::validation("calf is dead"),
        );

        assert_eq!(report.attempted(), 2);
        assert!(!report.is_success());

        let summary = report.summary();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.messages, vec!["calf c2: Validation failed: calf is dead"]);
    }

    #[test]
    fn test_into_result() {
        let mut clean = BatchReport::default();
        clean.record(EntityRef::Cow("a".into()), Ok(()));
        assert_eq!(clean.into_result().unwrap(), vec![EntityRef::Cow("a".into())]);

        let mut dirty = BatchReport::default();
        dirty.record(EntityRef::Cow("a".into()), Ok(()));
        dirty.fail(EntityRef::Cow("b".into()), HerdError::validation("nope"));
        let err = dirty.into_result().unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 batch items failed");
    }
}
