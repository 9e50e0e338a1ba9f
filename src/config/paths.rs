//! Path management for wimm
//!
//! All ledger files live in one data directory.
//!
//! ## Path Resolution Order
//!
//! 1. `WIMM_PATH` environment variable (if set)
//! 2. The platform data directory (`~/.local/share/wimm` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::WimmError;

/// Environment variable pointing at the data directory
pub const PATH_ENV_VAR: &str = "WIMM_PATH";

/// Manages all paths used by wimm
#[derive(Debug, Clone)]
pub struct WimmPaths {
    /// Base directory holding every ledger file
    base_dir: PathBuf,
}

impl WimmPaths {
    /// Create a new WimmPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if `WIMM_PATH` is unset and no platform data
    /// directory can be determined.
    pub fn new() -> Result<Self, WimmError> {
        let base_dir = match std::env::var_os(PATH_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create WimmPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.yaml")
    }

    /// Get the path to the starting balance snapshot
    pub fn balance_file(&self) -> PathBuf {
        self.base_dir.join("balance.yaml")
    }

    /// Get the path to transactions.yaml
    pub fn transactions_file(&self) -> PathBuf {
        self.base_dir.join("transactions.yaml")
    }

    /// Get the path to invoices.yaml
    pub fn invoices_file(&self) -> PathBuf {
        self.base_dir.join("invoices.yaml")
    }

    /// Get an attachment folder by its name relative to the base directory
    pub fn folder(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), WimmError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WimmError::Io(format!("Failed to create data directory: {}", e)))
    }

    /// Check if wimm has been initialized (transaction log exists)
    pub fn is_initialized(&self) -> bool {
        self.transactions_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, WimmError> {
    ProjectDirs::from("", "", "wimm")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            WimmError::Config(format!(
                "Could not determine a data directory; set {}",
                PATH_ENV_VAR
            ))
        })
}
