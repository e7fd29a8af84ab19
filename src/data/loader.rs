//! JSON file helpers shared by the content and credential stores.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{QuizError, Result};

/// Read and parse a JSON file. Returns `Ok(None)` if the file does not exist.
pub fn load_json<T, P>(path: P) -> Result<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(QuizError::io(path, err)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|err| QuizError::format(path, err))
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// The data is written to a temporary file in the same directory and renamed
/// over the target, so readers never observe a half-written file.
pub fn save_json_atomic<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value).map_err(|err| QuizError::format(path, err))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| QuizError::io(dir, err))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| QuizError::io(dir, err))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.write_all(b"\n"))
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| QuizError::io(tmp.path(), err))?;
    tmp.persist(path)
        .map_err(|err| QuizError::io(path, err.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<BTreeMap<String, String>> =
            load_json(dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.json");
        let mut users = BTreeMap::new();
        users.insert("admin".to_string(), "admin".to_string());

        save_json_atomic(&path, &users).unwrap();
        let loaded: BTreeMap<String, String> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded, users);

        // No temp files left behind.
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<BTreeMap<String, String>, _>(&path).unwrap_err();
        assert!(matches!(err, QuizError::Format { .. }));
    }
}
