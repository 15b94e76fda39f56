//! Content navigation service
//!
//! Owns the navigation index of one content object type and keeps it in
//! step with the repository through full rebuilds.

use std::sync::Arc;

use tracing::{debug, info, instrument, trace};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{ContentObjectType, ForestBuilder, NavigationIndex};
use crate::infrastructure::traits::NavigationRepository;

/// Service exposing the navigation index for documents or media.
///
/// Queries go through [`index`](Self::index), structural edits through
/// [`index_mut`](Self::index_mut). The caller reconciles accepted edits with
/// the durable store.
pub struct NavigationService {
    repository: Arc<dyn NavigationRepository>,
    object_type: ContentObjectType,
    builder: ForestBuilder,
    index: NavigationIndex,
}

impl NavigationService {
    /// Create a service with an empty index; call [`rebuild`](Self::rebuild)
    /// before relying on it.
    pub fn new(
        repository: Arc<dyn NavigationRepository>,
        object_type: ContentObjectType,
        settings: &Settings,
    ) -> Self {
        Self {
            repository,
            object_type,
            builder: ForestBuilder::new(settings.root_parent_id),
            index: NavigationIndex::new(),
        }
    }

    pub fn object_type(&self) -> ContentObjectType {
        self.object_type
    }

    pub fn index(&self) -> &NavigationIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut NavigationIndex {
        &mut self.index
    }

    /// Replace the index with the repository's current rows.
    ///
    /// Repository and row errors are returned to the caller; the index then
    /// still holds its previous snapshot.
    #[instrument(level = "debug", skip(self), fields(object_type = %self.object_type))]
    pub fn rebuild(&mut self) -> ApplicationResult<()> {
        let rows = self.repository.navigation_rows(self.object_type)?;
        debug!("rebuild: fetched {} rows", rows.len());

        self.index.rebuild_with(&self.builder, &rows)?;
        info!(
            "rebuild {}: live={} bin={}",
            self.object_type,
            self.index.len(),
            self.index.bin_len()
        );
        trace!("rebuild {}:\n{}", self.object_type, self.index);
        Ok(())
    }
}
