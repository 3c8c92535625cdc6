//! Errors raised by the lifecycle, trash and resolver layers.

use thiserror::Error;

use crate::batch::BatchFailure;
use crate::db::{Database, DbError, Record, Trashable};
use crate::models::{EntityKind, EntityRef};

#[derive(Error, Debug)]
pub enum HerdError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A required field is missing or malformed. Raised before any write.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Cannot purge {target}: still referenced by {dependent}")]
    DependencyConflict {
        target: EntityRef,
        dependent: EntityRef,
    },

    #[error("Invalid transition for {entity}: {reason}")]
    InvalidTransition { entity: EntityRef, reason: String },

    #[error("Purge of {0} records aborted by another record in the same batch")]
    PartitionAborted(EntityKind),

    #[error("{} of {attempted} batch items failed", .failures.len())]
    Batch {
        attempted: usize,
        failures: Vec<BatchFailure>,
    },
}

pub type HerdResult<T> = Result<T, HerdError>;

impl HerdError {
    pub fn validation(message: impl Into<String>) -> Self {
        HerdError::Validation(message.into())
    }

    pub fn not_found<R: Record>(id: &str) -> Self {
        HerdError::NotFound {
            kind: R::NAME,
            id: id.to_string(),
        }
    }

    pub fn invalid_transition(entity: EntityRef, reason: impl Into<String>) -> Self {
        HerdError::InvalidTransition {
            entity,
            reason: reason.into(),
        }
    }
}

/// Load a record or fail with [`HerdError::NotFound`].
pub(crate) fn fetch<R: Record>(db: &Database, id: &str) -> HerdResult<R> {
    db.get::<R>(id)?.ok_or_else(|| HerdError::not_found::<R>(id))
}

/// Load a record that is not in the trash. A trashed record counts as
/// missing.
pub(crate) fn fetch_active<R: Trashable>(db: &Database, id: &str) -> HerdResult<R> {
    match db.get::<R>(id)? {
        Some(record) if !record.in_trash() => Ok(record),
        _ => Err(HerdError::not_found::<R>(id)),
    }
}
