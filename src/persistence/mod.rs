//! JSON file persistence
//!
//! Writes go to `<file>.tmp` first and are renamed over the target, so a
//! crash mid-write leaves the previous file intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PersistenceError;

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON and replace `path`
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("worm-arena-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("persist");
        let path = dir.join("nested").join("data.json");
        let mut value = BTreeMap::new();
        value.insert("best".to_string(), 420u64);

        save_json(&path, &value).unwrap();
        assert!(!tmp_path(&path).exists());
        let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_errors_name_the_file() {
        let dir = scratch_dir("persist-err");
        let missing = dir.join("missing.json");
        let err = load_json::<u64>(&missing).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));

        let corrupt = dir.join("corrupt.json");
        fs::write(&corrupt, "{").unwrap();
        let err = load_json::<u64>(&corrupt).unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
