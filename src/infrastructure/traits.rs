//! I/O boundary traits for testability
//!
//! The repository supplying navigation rows is abstracted here, allowing
//! services to be tested with in-memory rows.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::domain::{ContentObjectType, NavigationRow};

/// Failure of the repository collaborator while supplying rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("navigation rows unavailable for {object_type}: {message}")]
pub struct RepositoryError {
    pub object_type: ContentObjectType,
    pub message: String,
}

/// Source of flat navigation rows, one sequence per content object type.
pub trait NavigationRepository: Send + Sync {
    /// Rows for `object_type`, trashed and live alike, in sibling order.
    fn navigation_rows(
        &self,
        object_type: ContentObjectType,
    ) -> Result<Vec<NavigationRow>, RepositoryError>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

#[derive(Debug, Default)]
struct RepositoryState {
    rows: HashMap<ContentObjectType, Vec<NavigationRow>>,
    failure: Option<String>,
}

/// Thread-safe row store for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryNavigationRepository {
    state: RwLock<RepositoryState>,
}

impl InMemoryNavigationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `rows` for `object_type`.
    pub fn with_rows(object_type: ContentObjectType, rows: Vec<NavigationRow>) -> Self {
        let repository = Self::new();
        repository.set_rows(object_type, rows);
        repository
    }

    /// Replace the rows served for `object_type`.
    pub fn set_rows(&self, object_type: ContentObjectType, rows: Vec<NavigationRow>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.rows.insert(object_type, rows);
    }

    /// Make every following read fail with `message`; `None` heals it.
    pub fn set_failure(&self, message: Option<String>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.failure = message;
    }
}

impl NavigationRepository for InMemoryNavigationRepository {
    fn navigation_rows(
        &self,
        object_type: ContentObjectType,
    ) -> Result<Vec<NavigationRow>, RepositoryError> {
        let state = self.state.read().map_err(|e| RepositoryError {
            object_type,
            message: format!("lock poisoned: {e}"),
        })?;
        if let Some(message) = &state.failure {
            return Err(RepositoryError {
                object_type,
                message: message.clone(),
            });
        }
        Ok(state.rows.get(&object_type).cloned().unwrap_or_default())
    }
}
