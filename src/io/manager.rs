use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

use crate::{
    io::{paths, FormatHandler, SharedHandler, SharedModel},
    misc::log::targets::{self},
    model::FeatureModel,
    types::err::{self},
};

/// The state of a manager, as of the most recent operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ManagerState {
    /// Neither read nor save has been called.
    #[default]
    Uninitialized,

    /// The primary file and every extra artifact were read.
    Loaded,

    /// Some part of the most recent read failed.
    LoadedWithErrors,

    /// A save is in progress.
    Saving,

    /// The primary file and every extra artifact were written.
    Saved,

    /// Some part of the most recent save failed.
    SavingWithErrors,
}

impl std::fmt::Display for ManagerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Loaded => write!(f, "Loaded"),
            Self::LoadedWithErrors => write!(f, "LoadedWithErrors"),
            Self::Saving => write!(f, "Saving"),
            Self::Saved => write!(f, "Saved"),
            Self::SavingWithErrors => write!(f, "SavingWithErrors"),
        }
    }
}

/// The result of a read or a save.
///
/// The primary result is that of the primary file (or of setting up the extra folder), and secondary errors are those of extra handlers, in order of registration.
/// If the primary result is an error, no extra handler was called.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub primary: Result<(), err::PersistError>,

    pub secondary: Vec<err::PersistError>,
}

impl Outcome {
    /// True if every part of the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.primary.is_ok() && self.secondary.is_empty()
    }

    /// Every error of the operation, with the primary error (if any) first.
    pub fn errors(&self) -> Vec<err::PersistError> {
        let mut errors = Vec::with_capacity(self.secondary.len() + 1);
        if let Err(e) = &self.primary {
            errors.push(e.clone());
        }
        errors.extend(self.secondary.iter().cloned());
        errors
    }

    fn aborted(error: err::PersistError) -> Self {
        Outcome {
            primary: Err(error),
            secondary: Vec::default(),
        }
    }
}

/// Keeps a model, and the extra artifacts of registered handlers, consistent with files on disk.
///
/// Reads and saves of a single manager are serialised, while handlers may be added or removed at any time.
/// A read or save uses the handlers registered when the operation begins.
pub struct PersistentModelManager {
    /// The canonical path of the primary file.
    path: PathBuf,

    file_name: String,

    extra_folder: PathBuf,

    model: SharedModel,

    format: Box<dyn FormatHandler<FeatureModel> + Send + Sync>,

    handlers: Mutex<Vec<SharedHandler>>,

    /// Held for the whole of a read or save, and records the errors of the most recent operation.
    operation: Mutex<Vec<err::PersistError>>,

    state: RwLock<ManagerState>,
}

impl std::fmt::Debug for PersistentModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentModelManager")
            .field("path", &self.path)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Locks a mutex, recovering from poison as the data under a lock is valid after any panic.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PersistentModelManager {
    /// A manager for the primary file at the path, which is canonicalised.
    ///
    /// Managers are usually obtained through a [registry](crate::io::ManagerRegistry), to ensure at most one manager for each path.
    pub fn new(
        path: &Path,
        model: SharedModel,
        format: Box<dyn FormatHandler<FeatureModel> + Send + Sync>,
    ) -> Result<Self, err::PersistError> {
        let path = paths::canonical_path(path)?;
        let file_name = paths::file_name(&path)?;
        let extra_folder = paths::extra_folder(&path)?;

        Ok(PersistentModelManager {
            path,
            file_name,
            extra_folder,
            model,
            format,
            handlers: Mutex::default(),
            operation: Mutex::default(),
            state: RwLock::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The hidden folder of extra artifacts.
    pub fn extra_folder(&self) -> &Path {
        &self.extra_folder
    }

    /// The file of the artifact of a handler with the given suffix.
    pub fn extra_path(&self, suffix: &str) -> PathBuf {
        paths::extra_path(&self.extra_folder, &self.file_name, suffix)
    }

    pub fn model(&self) -> SharedModel {
        self.model.clone()
    }

    pub fn state(&self) -> ManagerState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ManagerState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn add_handler(&self, handler: SharedHandler) {
        lock(&self.handlers).push(handler);
    }

    /// Removes a handler, returning true if the handler was registered.
    pub fn remove_handler(&self, handler: &SharedHandler) -> bool {
        let mut handlers = lock(&self.handlers);
        let before = handlers.len();
        handlers.retain(|registered| !Arc::ptr_eq(registered, handler));
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.handlers).len()
    }

    /// The errors of the most recent read or save.
    pub fn last_errors(&self) -> Vec<err::PersistError> {
        lock(&self.operation).clone()
    }

    /// Records the outcome of an operation, and moves to the matching state.
    fn conclude(
        &self,
        last_errors: &mut Vec<err::PersistError>,
        outcome: Outcome,
        ok: ManagerState,
        failed: ManagerState,
    ) -> Outcome {
        *last_errors = outcome.errors();
        for error in last_errors.iter() {
            log::error!(target: targets::PERSISTENCE, "{}: {error}", self.file_name);
        }
        match outcome.is_ok() {
            true => self.set_state(ok),
            false => self.set_state(failed),
        }
        outcome
    }

    /// Reads the primary file into the model, and then the artifact of each extra handler.
    ///
    /// A primary file which does not exist is skipped, leaving the model untouched.
    /// If the primary file exists and cannot be read, the model is untouched and no extra handler is called.
    /// Artifacts are read only if the extra folder exists, and a handler without an artifact file is skipped.
    pub fn read(&self) -> Outcome {
        let mut last_errors = lock(&self.operation);
        last_errors.clear();

        let outcome = self.read_files();
        self.conclude(
            &mut last_errors,
            outcome,
            ManagerState::Loaded,
            ManagerState::LoadedWithErrors,
        )
    }

    fn read_files(&self) -> Outcome {
        if self.path.exists() {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) => return Outcome::aborted(err::PersistError::io(&self.path, e)),
            };

            match self.format.read(&content) {
                Ok(model) => {
                    *self.model.write().unwrap_or_else(PoisonError::into_inner) = model;
                    log::debug!(target: targets::PERSISTENCE, "Read {}", self.path.display());
                }
                Err(e) => return Outcome::aborted(err::PersistError::format(&self.path, e)),
            }
        } else {
            log::debug!(target: targets::PERSISTENCE, "No model at {}", self.path.display());
        }

        let mut secondary = Vec::default();
        if self.extra_folder.is_dir() {
            let handlers = lock(&self.handlers).clone();
            for handler in handlers {
                let mut handler = lock(&*handler);
                let path = self.extra_path(handler.suffix());
                if !path.is_file() {
                    log::debug!(target: targets::PERSISTENCE, "No artifact at {}", path.display());
                    continue;
                }

                let result = std::fs::read_to_string(&path)
                    .map_err(|e| err::PersistError::io(&path, e))
                    .and_then(|content| {
                        handler
                            .read(&content)
                            .map_err(|e| err::PersistError::format(&path, e))
                    });
                if let Err(e) = result {
                    secondary.push(e);
                }
            }
        }

        Outcome {
            primary: Ok(()),
            secondary,
        }
    }

    /// Writes the model to the primary file, and then the artifact of each extra handler.
    ///
    /// The extra folder is created first, if needed, though not any missing ancestor of the folder.
    /// If either the folder cannot be created or the primary file cannot be written no extra handler is called.
    pub fn save(&self) -> Outcome {
        let mut last_errors = lock(&self.operation);
        last_errors.clear();
        self.set_state(ManagerState::Saving);

        let outcome = self.write_files();
        self.conclude(
            &mut last_errors,
            outcome,
            ManagerState::Saved,
            ManagerState::SavingWithErrors,
        )
    }

    fn write_files(&self) -> Outcome {
        if !self.extra_folder.is_dir() {
            if let Err(e) = std::fs::create_dir(&self.extra_folder) {
                return Outcome::aborted(err::PersistError::FolderCreation {
                    path: self.extra_folder.clone(),
                    source: Arc::new(e),
                });
            }
            log::debug!(target: targets::PERSISTENCE, "Created {}", self.extra_folder.display());
        }

        let written = {
            let model = self.model.read().unwrap_or_else(PoisonError::into_inner);
            self.format.write(&model)
        };
        let content = match written {
            Ok(content) => content,
            Err(e) => return Outcome::aborted(err::PersistError::format(&self.path, e)),
        };
        if let Err(e) = std::fs::write(&self.path, content) {
            return Outcome::aborted(err::PersistError::io(&self.path, e));
        }
        log::debug!(target: targets::PERSISTENCE, "Wrote {}", self.path.display());

        let mut secondary = Vec::default();
        let handlers = lock(&self.handlers).clone();
        for handler in handlers {
            let handler = lock(&*handler);
            let path = self.extra_path(handler.suffix());
            let result = handler
                .write()
                .map_err(|e| err::PersistError::format(&path, e))
                .and_then(|content| {
                    std::fs::write(&path, content).map_err(|e| err::PersistError::io(&path, e))
                });
            if let Err(e) = result {
                secondary.push(e);
            }
        }

        Outcome {
            primary: Ok(()),
            secondary,
        }
    }
}
