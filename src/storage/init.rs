//! Storage initialization
//!
//! Handles first-run setup of a data directory. Existing files are never
//! overwritten, so running init twice is harmless.

use crate::config::paths::WimmPaths;
use crate::config::settings::Settings;
use crate::error::WimmError;
use crate::models::{AccountName, Balances, InvoiceLog, TransactionLog};

use super::file_io::write_yaml_atomic;

/// Accounts opened at zero in a fresh starting balance
pub const DEFAULT_ACCOUNTS: &[&str] = &[
    "Assets",
    "Assets.Bank",
    "Liabilities",
    "Ext.Clients",
    "Ext.Suppliers",
    "Ext",
];

/// Initialize storage for a fresh data directory
///
/// Creates the starting balance, empty transaction and invoice logs, the
/// invoice attachment folders and the settings file.
pub fn initialize_storage(paths: &WimmPaths, settings: &Settings) -> Result<(), WimmError> {
    paths.ensure_directories()?;

    if !paths.balance_file().exists() {
        write_yaml_atomic(paths.balance_file(), &default_balances()?)?;
    }
    if !paths.transactions_file().exists() {
        write_yaml_atomic(paths.transactions_file(), &TransactionLog::new())?;
    }
    if !paths.invoices_file().exists() {
        write_yaml_atomic(paths.invoices_file(), &InvoiceLog::new())?;
    }

    for folder in settings.invoice_folders.values() {
        let dir = paths.folder(folder);
        std::fs::create_dir_all(&dir).map_err(|e| {
            WimmError::Io(format!("Failed to create folder {}: {}", dir.display(), e))
        })?;
    }

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    tracing::info!("Initialized data directory {}", paths.base_dir().display());
    Ok(())
}

fn default_balances() -> Result<Balances, WimmError> {
    let accounts = DEFAULT_ACCOUNTS
        .iter()
        .map(|name| AccountName::parse(name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Balances::with_accounts(accounts))
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &WimmPaths) -> bool {
    !paths.is_initialized()
}
