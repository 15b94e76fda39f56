//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::ContentKey;

/// Domain errors represent structural violations of the navigation forests.
/// A returned error always means nothing was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NotFound(ContentKey),

    #[error("node not found in recycle bin: {0}")]
    NotInBin(ContentKey),

    #[error("node already exists: {0}")]
    DuplicateKey(ContentKey),

    #[error("parent not found: {0}")]
    ParentNotFound(ContentKey),

    #[error("cannot move node under itself: {0}")]
    SelfReference(ContentKey),

    #[error("cycle detected: cannot move {key} under its descendant {target}")]
    CycleDetected { key: ContentKey, target: ContentKey },

    #[error("duplicate key in navigation rows: {0}")]
    DuplicateRow(ContentKey),

    #[error("duplicate row id in navigation rows: {0}")]
    DuplicateRowId(i64),

    #[error("cycle detected in navigation rows at: {0}")]
    RowCycle(ContentKey),
}

/// Result type for navigation structure operations.
pub type DomainResult<T> = Result<T, DomainError>;
