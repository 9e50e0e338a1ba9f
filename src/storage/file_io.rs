//! File I/O utilities with atomic writes
//!
//! Ledger files are YAML documents meant to be edited by hand as well as by
//! wimm. Writes go through a temp file and a rename so a crash never leaves
//! a half-written ledger behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::WimmError;

/// Read YAML from a file, returning a default value if file doesn't exist
pub fn read_yaml<T, P>(path: P) -> Result<T, WimmError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        tracing::debug!("{} does not exist, using defaults", path.display());
        return Ok(T::default());
    }

    let text = fs::read_to_string(path)
        .map_err(|e| WimmError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    // an empty ledger file holds no YAML node at all
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(&text)
        .map_err(|e| WimmError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read YAML from a file, returning an error if file doesn't exist
pub fn read_yaml_required<T, P>(path: P) -> Result<T, WimmError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(WimmError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| WimmError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_yaml::from_reader(reader)
        .map_err(|e| WimmError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Serialize a value to a YAML string
pub fn to_yaml_string<T: Serialize>(data: &T) -> Result<String, WimmError> {
    serde_yaml::to_string(data)
        .map_err(|e| WimmError::Storage(format!("Failed to serialize data: {}", e)))
}

/// Write YAML to a file atomically (write to temp, then rename)
pub fn write_yaml_atomic<T, P>(path: P, data: &T) -> Result<(), WimmError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let text = to_yaml_string(data)?;
    write_text_atomic(path, &text)
}

/// Append items to a YAML sequence file under a comment line
///
/// The items are written as new sequence entries at the end of the file so
/// existing content, including hand-written comments, is kept verbatim. A
/// missing or empty file is started fresh.
pub fn append_yaml<T, P>(path: P, items: &[T], comment: &str) -> Result<(), WimmError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if items.is_empty() {
        return Ok(());
    }

    let existing = if path.exists() {
        fs::read_to_string(path).map_err(|e| {
            WimmError::Storage(format!("Failed to open {}: {}", path.display(), e))
        })?
    } else {
        String::new()
    };

    let mut text = match existing.trim() {
        "" | "[]" => String::new(),
        _ => {
            let mut kept = existing;
            if !kept.ends_with('\n') {
                kept.push('\n');
            }
            kept
        }
    };

    text.push_str(&format!("# {}\n", comment));
    text.push_str(&to_yaml_string(&items)?);

    tracing::debug!("Appending {} entries to {}", items.len(), path.display());
    write_text_atomic(path, &text)
}

/// Write text to a file atomically
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes or power failures.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, text: &str) -> Result<(), WimmError> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            WimmError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("yaml.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| WimmError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .map_err(|e| WimmError::Storage(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| WimmError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| WimmError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        WimmError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn item(name: &str, value: i32) -> TestData {
        TestData {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.yaml");

        let data: TestData = read_yaml(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_read_empty_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();

        let data: Vec<TestData> = read_yaml(&path).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.yaml");

        let data = item("test", 42);
        write_yaml_atomic(&path, &data).unwrap();
        assert!(path.exists());

        let loaded: TestData = read_yaml(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.yaml");
        let temp_path = temp_dir.path().join("test.yaml.tmp");

        write_yaml_atomic(&path, &item("test", 42)).unwrap();

        assert!(path.exists());
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.yaml");

        write_yaml_atomic(&path, &item("test", 42)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_yaml_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.yaml");

        assert!(read_yaml_required::<TestData, _>(&path).is_err());

        write_yaml_atomic(&path, &item("test", 42)).unwrap();
        let loaded: TestData = read_yaml_required(&path).unwrap();
        assert_eq!(loaded, item("test", 42));
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.yaml");
        fs::write(&path, "# my notes\n- name: a\n  value: 1\n").unwrap();

        append_yaml(&path, &[item("b", 2), item("c", 3)], "---IMPORT---").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# my notes\n"));
        assert!(text.contains("# ---IMPORT---\n"));

        let loaded: Vec<TestData> = read_yaml(&path).unwrap();
        assert_eq!(loaded, vec![item("a", 1), item("b", 2), item("c", 3)]);
    }

    #[test]
    fn test_append_to_empty_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.yaml");
        write_yaml_atomic(&path, &Vec::<TestData>::new()).unwrap();

        append_yaml(&path, &[item("a", 1)], "first").unwrap();

        let loaded: Vec<TestData> = read_yaml(&path).unwrap();
        assert_eq!(loaded, vec![item("a", 1)]);
    }

    #[test]
    fn test_append_nothing_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.yaml");

        append_yaml::<TestData, _>(&path, &[], "nothing").unwrap();
        assert!(!path.exists());
    }
}
