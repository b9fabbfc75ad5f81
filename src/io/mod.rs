/*!
Persistence of feature models, together with artifacts derived from a model.

# Overview

A model lives in a single *primary* file, read and written by a [FormatHandler].
Alongside the primary file, any number of *extra* artifacts (colour schemes, exports of the formula, and so on) are kept by [PersistentHandler]s, one file per handler, in a hidden folder named after the primary file:

```text
<parent>/<file_name>
<parent>/.<file_name>/<file_name>.<suffix>
```

A [PersistentModelManager] coordinates reads and saves of the primary file and every registered extra handler, and [ManagerRegistry] ensures there is at most one manager for each (canonical) path.

# Partial failure

Failure of the primary file aborts a read or save, while failure of some extra handler is recorded and the remaining handlers still run.
A primary file which does not yet exist is not a failure, and a read then leaves the model as it is.
Reads and saves return an [Outcome] holding both, and the errors of the most recent operation are also kept by the manager.

```rust
# use fm_core::io::{ManagerRegistry, formats::JsonFormat, shared_model};
# use fm_core::model::FeatureModel;
let dir = tempfile::tempdir().unwrap();
let path = dir.path().join("car.json");

let registry = ManagerRegistry::default();
let manager = registry
    .instance(&path, shared_model(FeatureModel::new("Car")), Box::new(JsonFormat))
    .unwrap();

assert!(manager.save().is_ok());
assert!(dir.path().join(".car.json").is_dir());
```
*/

pub mod formats;
mod manager;
pub mod paths;
mod registry;

pub use manager::{ManagerState, Outcome, PersistentModelManager};
pub use registry::{global_registry, ManagerRegistry};

use std::sync::{Arc, Mutex, RwLock};

use crate::{model::FeatureModel, types::err};

/// A model shared between a manager and its owner.
pub type SharedModel = Arc<RwLock<FeatureModel>>;

/// A model wrapped for sharing.
pub fn shared_model(model: FeatureModel) -> SharedModel {
    Arc::new(RwLock::new(model))
}

/// Conversion between some object and text.
pub trait FormatHandler<T> {
    /// The file suffix (without a dot) associated with the format.
    fn suffix(&self) -> &str;

    fn read(&self, content: &str) -> Result<T, err::FormatError>;

    fn write(&self, object: &T) -> Result<String, err::FormatError>;
}

/// The handler of some extra artifact, which holds the artifact itself.
pub trait PersistentHandler {
    /// The suffix of the file of the artifact, distinct between handlers of a manager.
    fn suffix(&self) -> &str;

    /// Replaces the artifact with the content read.
    fn read(&mut self, content: &str) -> Result<(), err::FormatError>;

    fn write(&self) -> Result<String, err::FormatError>;
}

/// An extra handler shared between a manager and its owner.
pub type SharedHandler = Arc<Mutex<dyn PersistentHandler + Send>>;

/// A handler wrapped for sharing.
pub fn shared_handler(handler: impl PersistentHandler + Send + 'static) -> SharedHandler {
    Arc::new(Mutex::new(handler))
}
