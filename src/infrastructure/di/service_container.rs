//! Service container for dependency injection
//!
//! Wires up one navigation service per configured content object type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use crate::application::services::NavigationService;
use crate::config::Settings;
use crate::domain::ContentObjectType;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{InMemoryNavigationRepository, NavigationRepository};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Repository supplying navigation rows
    pub repository: Arc<dyn NavigationRepository>,

    navigation: HashMap<ContentObjectType, NavigationService>,
}

impl ServiceContainer {
    /// Create a container backed by an empty in-memory repository.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(InMemoryNavigationRepository::new()))
    }

    /// Create a service container with a custom repository.
    pub fn with_deps(settings: Settings, repository: Arc<dyn NavigationRepository>) -> Self {
        let settings = Arc::new(settings);
        let navigation = settings
            .object_types
            .iter()
            .map(|&object_type| {
                (
                    object_type,
                    NavigationService::new(Arc::clone(&repository), object_type, &settings),
                )
            })
            .collect();

        Self {
            settings,
            repository,
            navigation,
        }
    }

    pub fn navigation(&self, object_type: ContentObjectType) -> Option<&NavigationService> {
        self.navigation.get(&object_type)
    }

    pub fn navigation_mut(
        &mut self,
        object_type: ContentObjectType,
    ) -> Option<&mut NavigationService> {
        self.navigation.get_mut(&object_type)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rebuild(&mut self, object_type: ContentObjectType) -> InfraResult<()> {
        let service = self
            .navigation
            .get_mut(&object_type)
            .ok_or(InfraError::NotConfigured(object_type))?;
        service.rebuild()?;
        Ok(())
    }

    /// Rebuild every configured service in configuration order, stopping at
    /// the first failure.
    pub fn rebuild_all(&mut self) -> InfraResult<()> {
        let object_types = self.settings.object_types.clone();
        for object_type in object_types {
            self.rebuild(object_type)?;
        }
        Ok(())
    }
}
