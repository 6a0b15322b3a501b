//! File I/O utilities
//!
//! Atomic JSON writes for the settings file, JSON line files for the log
//! store, and plain reads used by the ledger loaders.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BalanceError, BalanceResult};

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json<T, P>(path: P) -> BalanceResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| BalanceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| BalanceError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> BalanceResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BalanceError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BalanceError::Json(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BalanceError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BalanceError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BalanceError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Append values to a JSON lines file, one object per line
pub fn append_json_lines<T, P>(path: P, items: &[T]) -> BalanceResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    if items.is_empty() {
        return Ok(());
    }

    let path = path.as_ref();
    ensure_parent(path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| BalanceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut writer = BufWriter::new(file);
    for item in items {
        let json = serde_json::to_string(item)
            .map_err(|e| BalanceError::Json(format!("Failed to serialize entry: {}", e)))?;
        writeln!(writer, "{}", json)
            .map_err(|e| BalanceError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| BalanceError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

/// Read a JSON lines file; a missing file reads as empty
pub fn read_json_lines<T, P>(path: P) -> BalanceResult<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| BalanceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut items = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            BalanceError::Io(format!("Failed to read {} line {}: {}", path.display(), line_num + 1, e))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let item = serde_json::from_str(&line).map_err(|e| {
            BalanceError::Json(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Remove a file, returning whether it existed
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> BalanceResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path)
        .map_err(|e| BalanceError::Io(format!("Failed to remove {}: {}", path.display(), e)))?;
    Ok(true)
}

fn ensure_parent(path: &Path) -> BalanceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            BalanceError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        month: String,
        balance: i64,
    }

    fn sample(month: &str, balance: i64) -> Sample {
        Sample {
            month: month.to_string(),
            balance,
        }
    }

    #[test]
    fn test_read_missing_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_json::<Sample, _>(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BalanceError::Io(_)));
    }

    #[test]
    fn test_write_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.json");

        write_json_atomic(&path, &sample("2024-01", 1200)).unwrap();
        assert!(!temp_dir.path().join("nested").join("sample.json.tmp").exists());

        let loaded: Sample = read_json(&path).unwrap();
        assert_eq!(loaded, sample("2024-01", 1200));
    }

    #[test]
    fn test_json_lines_append_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entries.jsonl");

        assert!(read_json_lines::<Sample, _>(&path).unwrap().is_empty());

        append_json_lines(&path, &[sample("2024-01", 1)]).unwrap();
        append_json_lines(&path, &[sample("2024-02", 2), sample("2024-03", 3)]).unwrap();

        let loaded: Vec<Sample> = read_json_lines(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[2], sample("2024-03", 3));
    }

    #[test]
    fn test_json_lines_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entries.jsonl");
        fs::write(&path, "{\"month\":\"2024-01\",\"balance\":1}\n\nnot json\n").unwrap();

        let err = read_json_lines::<Sample, _>(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        assert!(!remove_if_exists(&path).unwrap());
        fs::write(&path, "{}").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }
}
