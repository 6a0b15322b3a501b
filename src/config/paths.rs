//! Path management for Mabourse
//!
//! ## Path Resolution Order
//!
//! 1. `MABOURSE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/mabourse` or `~/.config/mabourse`
//! 3. Windows: `%APPDATA%\mabourse`

use std::path::{Path, PathBuf};

use crate::error::{BalanceError, BalanceResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MABOURSE_DATA_DIR";

/// Manages all paths used by Mabourse
#[derive(Debug, Clone)]
pub struct MaboursePaths {
    base_dir: PathBuf,
}

impl MaboursePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> BalanceResult<Self> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Paths rooted at the directory holding a given config file
    pub fn for_config_file(config_path: &Path) -> Self {
        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Path to the persisted log entries
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("logs.jsonl")
    }

    /// Default transaction ledger
    pub fn transactions_file(&self) -> PathBuf {
        self.base_dir.join("transactions.csv")
    }

    /// Default adjustment file
    pub fn adjustments_file(&self) -> PathBuf {
        self.base_dir.join("adjustments.csv")
    }

    /// Resolve a file named in the settings: relative paths are taken
    /// from the base directory
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.base_dir.join(file)
        }
    }

    pub fn ensure_directories(&self) -> BalanceResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BalanceError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> BalanceResult<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BalanceError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("mabourse"))
}

#[cfg(windows)]
fn resolve_default_path() -> BalanceResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BalanceError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("mabourse"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MaboursePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.log_file(), temp_dir.path().join("logs.jsonl"));
        assert_eq!(paths.transactions_file(), temp_dir.path().join("transactions.csv"));
        assert_eq!(paths.adjustments_file(), temp_dir.path().join("adjustments.csv"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = MaboursePaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_for_config_file() {
        let paths = MaboursePaths::for_config_file(Path::new("/tmp/budget/config.json"));
        assert_eq!(paths.base_dir(), Path::new("/tmp/budget"));

        let paths = MaboursePaths::for_config_file(Path::new("config.json"));
        assert_eq!(paths.base_dir(), Path::new("."));
    }

    #[test]
    fn test_resolve_relative_files() {
        let paths = MaboursePaths::with_base_dir(PathBuf::from("/data"));
        assert_eq!(paths.resolve(Path::new("ledger.json")), PathBuf::from("/data/ledger.json"));
        assert_eq!(paths.resolve(Path::new("/abs/ledger.csv")), PathBuf::from("/abs/ledger.csv"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MaboursePaths::with_base_dir(temp_dir.path().join("nested"));
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
        assert!(!paths.is_initialized());
    }
}
