//! Paths of primary files and of extra artifacts.
//!
//! Managers are keyed by canonical path, so `model.json`, `./model.json`, and `/abs/model.json` all reach the same manager.
//! The primary file need not exist (e.g. before a first save), in which case the parent is canonicalised instead, and if the parent does not exist either the path is made absolute and normalised without touching the file system.

use std::{
    ffi::OsString,
    path::{Component, Path, PathBuf},
};

use crate::types::err;

/// The canonical form of a path to a primary file.
pub fn canonical_path(path: &Path) -> Result<PathBuf, err::PersistError> {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return Ok(canonical);
    }

    let absolute = match path.is_absolute() {
        true => path.to_path_buf(),
        false => std::env::current_dir()
            .map_err(|e| err::PersistError::io(path, e))?
            .join(path),
    };
    let absolute = normalise(&absolute);

    let Some(file_name) = absolute.file_name().map(|name| name.to_owned()) else {
        return Err(err::PersistError::InvalidPath(path.to_path_buf()));
    };

    match absolute.parent().map(std::fs::canonicalize) {
        Some(Ok(parent)) => Ok(parent.join(file_name)),
        _ => Ok(absolute),
    }
}

/// Removes `.` and resolves `..` components, lexically.
fn normalise(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }
    normal
}

/// The file name of a canonical path.
pub fn file_name(path: &Path) -> Result<String, err::PersistError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| err::PersistError::InvalidPath(path.to_path_buf()))
}

/// The hidden folder of extra artifacts for a primary file: `<parent>/.<file_name>`.
pub fn extra_folder(path: &Path) -> Result<PathBuf, err::PersistError> {
    let name = path
        .file_name()
        .ok_or_else(|| err::PersistError::InvalidPath(path.to_path_buf()))?;
    let mut hidden = OsString::from(".");
    hidden.push(name);

    Ok(match path.parent() {
        Some(parent) => parent.join(hidden),
        None => PathBuf::from(hidden),
    })
}

/// The file of the artifact with the given suffix: `<folder>/<file_name>.<suffix>`.
pub fn extra_path(folder: &Path, file_name: &str, suffix: &str) -> PathBuf {
    folder.join(format!("{file_name}.{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_paths() {
        let primary = Path::new("/models/car.json");
        let folder = extra_folder(primary).unwrap();
        assert_eq!(folder, PathBuf::from("/models/.car.json"));
        assert_eq!(
            extra_path(&folder, "car.json", "colors"),
            PathBuf::from("/models/.car.json/car.json.colors")
        );
    }

    #[test]
    fn canonical_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let parent = std::fs::canonicalize(dir.path()).unwrap();

        let direct = canonical_path(&dir.path().join("model.json")).unwrap();
        let dotted = canonical_path(&dir.path().join(".").join("model.json")).unwrap();

        assert_eq!(direct, parent.join("model.json"));
        assert_eq!(direct, dotted);
    }

    #[test]
    fn canonical_missing_parent() {
        let path = Path::new("/no/such/../place/model.json");
        assert_eq!(
            canonical_path(path).unwrap(),
            PathBuf::from("/no/place/model.json")
        );
    }

    #[test]
    fn no_file_name() {
        assert!(matches!(
            file_name(Path::new("/")),
            Err(err::PersistError::InvalidPath(_))
        ));
    }
}
