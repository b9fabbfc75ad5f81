use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use crate::{
    io::{paths, FormatHandler, PersistentModelManager, SharedModel},
    misc::log::targets::{self},
    model::FeatureModel,
    types::err::{self},
};

/// A map from canonical paths to managers, with at most one manager for each path.
///
/// Lookup and creation happen under a single lock, so concurrent requests for the same path receive the same manager.
///
/// The model and format given when requesting a manager are only used if no manager exists for the path.
/// In particular, requesting a manager for a known path with a different model returns the existing manager, with the existing model.
#[derive(Default)]
pub struct ManagerRegistry {
    managers: Mutex<HashMap<PathBuf, Arc<PersistentModelManager>>>,
}

impl ManagerRegistry {
    /// The manager for the path, created from the model and format if there is no such manager.
    pub fn instance(
        &self,
        path: impl AsRef<Path>,
        model: SharedModel,
        format: Box<dyn FormatHandler<FeatureModel> + Send + Sync>,
    ) -> Result<Arc<PersistentModelManager>, err::PersistError> {
        let canonical = paths::canonical_path(path.as_ref())?;

        let mut managers = self.managers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(manager) = managers.get(&canonical) {
            log::debug!(target: targets::REGISTRY, "Existing manager for {}", canonical.display());
            return Ok(manager.clone());
        }

        let manager = Arc::new(PersistentModelManager::new(&canonical, model, format)?);
        log::debug!(target: targets::REGISTRY, "New manager for {}", canonical.display());
        managers.insert(canonical, manager.clone());
        Ok(manager)
    }

    /// The manager for the path, if one exists.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<PersistentModelManager>> {
        let canonical = paths::canonical_path(path.as_ref()).ok()?;
        self.managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&canonical)
            .cloned()
    }

    /// Removes the manager for the path from the registry, returning the manager if one existed.
    ///
    /// Handles to the manager remain valid, though a later request for the path creates a new manager.
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<Arc<PersistentModelManager>> {
        let canonical = paths::canonical_path(path.as_ref()).ok()?;
        self.managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&canonical)
    }

    pub fn len(&self) -> usize {
        self.managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registry shared by the whole process.
pub fn global_registry() -> &'static ManagerRegistry {
    static REGISTRY: OnceLock<ManagerRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ManagerRegistry::default)
}
