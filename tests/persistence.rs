use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use fm_core::{
    io::{
        formats::{Color, ColorScheme, ColorSchemeHandler, DimacsExport, JsonFormat},
        shared_handler, shared_model, FormatHandler, ManagerRegistry, ManagerState,
        PersistentHandler,
    },
    model::{expr::Expr, FeatureModel, GroupKind},
    types::err::{FormatError, PersistError},
};

fn phone() -> FeatureModel {
    let mut model = FeatureModel::new("Phone");
    model.add_child("Phone", "Calls", true);
    model.add_child("Phone", "Screen", true);
    model.add_child("Phone", "GPS", false);
    model.add_child("Screen", "Basic", false);
    model.add_child("Screen", "HighRes", false).is_abstract = true;
    model.set_group("Screen", GroupKind::Alternative);
    model.constraints.push(Expr::implies(Expr::var("GPS"), Expr::not(Expr::var("Basic"))));
    model
}

/// Counts calls, and fails to read.
#[derive(Default)]
struct Failing {
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl PersistentHandler for Failing {
    fn suffix(&self) -> &str {
        "failing"
    }

    fn read(&mut self, _: &str) -> Result<(), FormatError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(FormatError::Malformed {
            line: 1,
            reason: "always".to_owned(),
        })
    }

    fn write(&self) -> Result<String, FormatError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok("failing".to_owned())
    }
}

/// A primary format which cannot write.
struct Unwritable;

impl FormatHandler<FeatureModel> for Unwritable {
    fn suffix(&self) -> &str {
        "json"
    }

    fn read(&self, content: &str) -> Result<FeatureModel, FormatError> {
        JsonFormat.read(content)
    }

    fn write(&self, _: &FeatureModel) -> Result<String, FormatError> {
        Err(FormatError::Empty)
    }
}

fn review_colors() -> ColorSchemeHandler {
    let mut scheme = ColorScheme {
        name: "review".to_owned(),
        ..Default::default()
    };
    scheme.colors.insert("GPS".to_owned(), Color::Blue);
    ColorSchemeHandler {
        schemes: vec![scheme],
        active: Some("review".to_owned()),
    }
}

mod registry {
    use super::*;

    #[test]
    fn singleton_keeps_first_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let registry = ManagerRegistry::default();

        let first = registry
            .instance(&path, shared_model(FeatureModel::new("First")), Box::new(JsonFormat))
            .unwrap();
        let second = registry
            .instance(
                dir.path().join(".").join("model.json"),
                shared_model(FeatureModel::new("Second")),
                Box::new(JsonFormat),
            )
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.model().read().unwrap().name, "First");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();

        let a = registry
            .instance(dir.path().join("a.json"), shared_model(phone()), Box::new(JsonFormat))
            .unwrap();
        let b = registry
            .instance(dir.path().join("b.json"), shared_model(phone()), Box::new(JsonFormat))
            .unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.file_name(), "a.json");
        assert!(registry.get(dir.path().join("b.json")).is_some());

        assert!(registry.remove(dir.path().join("a.json")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let registry = ManagerRegistry::default();

        let managers = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|index| {
                    let path = &path;
                    let registry = &registry;
                    scope.spawn(move || {
                        registry
                            .instance(
                                path,
                                shared_model(FeatureModel::new(&format!("M{index}"))),
                                Box::new(JsonFormat),
                            )
                            .unwrap()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        for manager in &managers {
            assert!(Arc::ptr_eq(manager, &managers[0]));
        }
    }
}

mod manager {
    use super::*;

    #[test]
    fn save_creates_hidden_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let registry = ManagerRegistry::default();

        let model = shared_model(phone());
        let manager = registry
            .instance(&path, model.clone(), Box::new(JsonFormat))
            .unwrap();
        manager.add_handler(shared_handler(review_colors()));
        manager.add_handler(shared_handler(DimacsExport::new(model)));

        assert_eq!(manager.state(), ManagerState::Uninitialized);
        assert!(!manager.extra_folder().exists());

        let outcome = manager.save();
        assert!(outcome.is_ok());
        assert_eq!(manager.state(), ManagerState::Saved);

        let hidden = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with('.'))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(hidden, vec![".model.json".to_owned()]);

        let folder = dir.path().join(".model.json");
        assert!(folder.join("model.json.colors").is_file());
        let dimacs = std::fs::read_to_string(folder.join("model.json.cnf")).unwrap();
        assert!(dimacs.contains("p cnf 6"));
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let saving = ManagerRegistry::default();
        let manager = saving
            .instance(&path, shared_model(phone()), Box::new(JsonFormat))
            .unwrap();
        manager.add_handler(shared_handler(review_colors()));
        assert!(manager.save().is_ok());

        let reading = ManagerRegistry::default();
        let model = shared_model(FeatureModel::default());
        let manager = reading
            .instance(&path, model.clone(), Box::new(JsonFormat))
            .unwrap();
        let colors = Arc::new(Mutex::new(ColorSchemeHandler::default()));
        manager.add_handler(colors.clone());

        assert!(manager.read().is_ok());
        assert_eq!(manager.state(), ManagerState::Loaded);
        assert_eq!(*model.read().unwrap(), phone());

        assert!(manager.extra_path("colors").is_file());
        assert_eq!(colors.lock().unwrap().color_of("GPS"), Some(Color::Blue));
        assert_eq!(colors.lock().unwrap().active.as_deref(), Some("review"));
    }

    #[test]
    fn partial_failure_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let saving = ManagerRegistry::default();
        let manager = saving
            .instance(&path, shared_model(phone()), Box::new(JsonFormat))
            .unwrap();
        manager.add_handler(shared_handler(Failing::default()));
        manager.add_handler(shared_handler(review_colors()));
        assert!(manager.save().is_ok());

        let reading = ManagerRegistry::default();
        let model = shared_model(FeatureModel::default());
        let manager = reading
            .instance(&path, model.clone(), Box::new(JsonFormat))
            .unwrap();

        let failing = Failing::default();
        let reads = failing.reads.clone();
        manager.add_handler(shared_handler(failing));

        let colors = Arc::new(Mutex::new(ColorSchemeHandler::default()));
        manager.add_handler(colors.clone());

        let outcome = manager.read();
        assert!(!outcome.is_ok());
        assert!(outcome.primary.is_ok());
        assert_eq!(outcome.secondary.len(), 1);
        assert!(matches!(outcome.secondary[0], PersistError::Format { .. }));

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(colors.lock().unwrap().color_of("GPS"), Some(Color::Blue));
        assert_eq!(*model.read().unwrap(), phone());

        assert_eq!(manager.state(), ManagerState::LoadedWithErrors);
        assert_eq!(manager.last_errors().len(), 1);
    }

    #[test]
    fn fresh_path_reads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(dir.path().join("fresh.json"), shared_model(phone()), Box::new(JsonFormat))
            .unwrap();

        let failing = Failing::default();
        let reads = failing.reads.clone();
        manager.add_handler(shared_handler(failing));

        let outcome = manager.read();
        assert!(outcome.is_ok());
        assert!(manager.last_errors().is_empty());
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(manager.state(), ManagerState::Loaded);

        // The model is untouched, and nothing is created.
        assert_eq!(*manager.model().read().unwrap(), phone());
        assert!(!manager.extra_folder().exists());
    }

    #[test]
    fn missing_primary_reads_extras() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let saving = ManagerRegistry::default();
        let manager = saving
            .instance(&path, shared_model(phone()), Box::new(JsonFormat))
            .unwrap();
        manager.add_handler(shared_handler(review_colors()));
        assert!(manager.save().is_ok());
        std::fs::remove_file(&path).unwrap();

        let reading = ManagerRegistry::default();
        let manager = reading
            .instance(&path, shared_model(FeatureModel::new("Blank")), Box::new(JsonFormat))
            .unwrap();
        let colors = Arc::new(Mutex::new(ColorSchemeHandler::default()));
        manager.add_handler(colors.clone());

        assert!(manager.read().is_ok());
        assert_eq!(manager.model().read().unwrap().name, "Blank");
        assert_eq!(colors.lock().unwrap().color_of("GPS"), Some(Color::Blue));
    }

    #[test]
    fn unreadable_primary_skips_extras() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not a model").unwrap();
        std::fs::create_dir(dir.path().join(".model.json")).unwrap();
        std::fs::write(dir.path().join(".model.json").join("model.json.failing"), "").unwrap();

        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(&path, shared_model(phone()), Box::new(JsonFormat))
            .unwrap();

        let failing = Failing::default();
        let reads = failing.reads.clone();
        manager.add_handler(shared_handler(failing));

        let outcome = manager.read();
        assert!(matches!(outcome.primary, Err(PersistError::Format { .. })));
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(manager.state(), ManagerState::LoadedWithErrors);
        assert_eq!(*manager.model().read().unwrap(), phone());
    }

    #[test]
    fn primary_write_failure_skips_extras() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(dir.path().join("model.json"), shared_model(phone()), Box::new(Unwritable))
            .unwrap();

        let failing = Failing::default();
        let writes = failing.writes.clone();
        manager.add_handler(shared_handler(failing));

        let outcome = manager.save();
        assert!(matches!(outcome.primary, Err(PersistError::Format { .. })));
        assert_eq!(writes.load(Ordering::SeqCst), 0);
        assert_eq!(manager.state(), ManagerState::SavingWithErrors);
        assert_eq!(manager.last_errors().len(), 1);

        // The next operation replaces the errors of the previous one.
        assert!(manager.read().is_ok());
        assert!(manager.last_errors().is_empty());
        assert_eq!(manager.state(), ManagerState::Loaded);
    }

    #[test]
    fn folder_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file occupies the place of the hidden folder.
        std::fs::write(dir.path().join(".model.json"), "").unwrap();

        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(dir.path().join("model.json"), shared_model(phone()), Box::new(JsonFormat))
            .unwrap();

        let outcome = manager.save();
        assert!(matches!(outcome.primary, Err(PersistError::FolderCreation { .. })));
        assert!(!dir.path().join("model.json").exists());
    }

    #[test]
    fn missing_parent_folder() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(
                dir.path().join("sub").join("model.json"),
                shared_model(phone()),
                Box::new(JsonFormat),
            )
            .unwrap();

        let outcome = manager.save();
        assert!(matches!(outcome.primary, Err(PersistError::FolderCreation { .. })));
        assert_eq!(manager.state(), ManagerState::SavingWithErrors);
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn serialised_operations() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();
        let model = shared_model(phone());
        let manager = registry
            .instance(dir.path().join("model.json"), model.clone(), Box::new(JsonFormat))
            .unwrap();
        manager.add_handler(shared_handler(review_colors()));
        manager.add_handler(shared_handler(DimacsExport::new(model.clone())));
        assert!(manager.save().is_ok());

        std::thread::scope(|scope| {
            for index in 0..8 {
                let manager = &manager;
                scope.spawn(move || {
                    for _ in 0..16 {
                        let outcome = match index % 2 {
                            0 => manager.save(),
                            _ => manager.read(),
                        };
                        assert!(outcome.is_ok(), "{:?}", outcome.errors());
                    }
                });
            }
        });

        assert!(manager.last_errors().is_empty());
        assert!(matches!(
            manager.state(),
            ManagerState::Saved | ManagerState::Loaded
        ));
        assert_eq!(*model.read().unwrap(), phone());

        let content = std::fs::read_to_string(manager.path()).unwrap();
        assert_eq!(JsonFormat.read(&content).unwrap(), phone());
    }

    #[test]
    fn handler_registration() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManagerRegistry::default();
        let manager = registry
            .instance(dir.path().join("model.json"), shared_model(phone()), Box::new(JsonFormat))
            .unwrap();

        let colors = shared_handler(review_colors());
        manager.add_handler(colors.clone());
        assert_eq!(manager.handler_count(), 1);

        assert!(manager.remove_handler(&colors));
        assert!(!manager.remove_handler(&colors));
        assert_eq!(manager.handler_count(), 0);
    }
}
