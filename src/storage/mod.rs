//! Storage layer for wimm
//!
//! Provides YAML file storage with atomic writes and append-only updates of
//! the ledger files.

pub mod balances;
pub mod file_io;
pub mod init;
pub mod invoices;
pub mod transactions;

pub use balances::BalanceRepository;
pub use file_io::{read_yaml, write_yaml_atomic};
pub use init::initialize_storage;
pub use invoices::InvoiceRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::WimmPaths;
use crate::error::WimmError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: WimmPaths,
    pub transactions: TransactionRepository,
    pub invoices: InvoiceRepository,
    pub balances: BalanceRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: WimmPaths) -> Result<Self, WimmError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            invoices: InvoiceRepository::new(paths.invoices_file()),
            balances: BalanceRepository::new(paths.balance_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &WimmPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), WimmError> {
        self.transactions.load()?;
        self.invoices.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
