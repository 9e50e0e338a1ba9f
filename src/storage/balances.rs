//! Starting balance snapshot
//!
//! balance.yaml holds the account balances the ledger starts from, as an
//! `account: amount` mapping. It is optional.

use std::path::PathBuf;

use crate::error::WimmError;
use crate::models::Balances;

use super::file_io::{read_yaml_required, write_yaml_atomic};

/// Repository for the starting balance snapshot
pub struct BalanceRepository {
    path: PathBuf,
}

impl BalanceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the snapshot, `None` when the file does not exist
    pub fn load(&self) -> Result<Option<Balances>, WimmError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let balances: Balances = read_yaml_required(&self.path)?;
        tracing::debug!("Loaded {} starting balances", balances.len());
        Ok(Some(balances))
    }

    /// Save a snapshot, replacing the previous one
    pub fn save(&self, balances: &Balances) -> Result<(), WimmError> {
        write_yaml_atomic(&self.path, balances)
    }
}
