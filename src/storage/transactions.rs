//! Transaction repository for YAML storage
//!
//! Manages loading and saving the transaction log in transactions.yaml.
//! Records written in the legacy `from`/`to`/`amount` shape are upconverted
//! while loading; saving always writes the transfer form.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::WimmError;
use crate::models::{Transaction, TransactionLog};

use super::file_io::{append_yaml, read_yaml, write_yaml_atomic};

/// Repository for transaction log persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<TransactionLog>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(TransactionLog::new()),
        }
    }

    /// Load the transaction log from disk
    pub fn load(&self) -> Result<(), WimmError> {
        let log: TransactionLog = read_yaml(&self.path)?;
        tracing::debug!("Loaded {} transactions from {}", log.len(), self.path.display());

        let mut data = self.data.write().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = log;
        Ok(())
    }

    /// Save the whole log to disk, rewriting the file
    pub fn save(&self) -> Result<(), WimmError> {
        let data = self.data.read().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_yaml_atomic(&self.path, &*data)
    }

    /// Get a copy of the whole log
    pub fn get_all(&self) -> Result<TransactionLog, WimmError> {
        let data = self.data.read().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Append transactions to the log and to the end of the file
    ///
    /// The file is extended rather than rewritten so hand-written comments
    /// survive; `comment` is written above the new entries.
    pub fn append(&self, transactions: Vec<Transaction>, comment: &str) -> Result<(), WimmError> {
        append_yaml(&self.path, &transactions, comment)?;

        let mut data = self.data.write().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        for txn in transactions {
            data.push(txn);
        }
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, WimmError> {
        let data = self.data.read().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountName, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.yaml");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn txn(day: u32, from: &str, to: &str, units: i64) -> Transaction {
        Transaction::transfer(
            NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
            "test",
            AccountName::parse(from).unwrap(),
            AccountName::parse(to).unwrap(),
            Money::from_units(units),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_repository() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_append_and_reload() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.append(vec![txn(1, "Ext.Bob", "Assets.Bank", 1000)], "first").unwrap();
        repo.append(vec![txn(2, "Assets.Bank", "Expenses", 50)], "second").unwrap();
        assert_eq!(repo.count().unwrap(), 2);

        let reloaded = TransactionRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all().unwrap(), repo.get_all().unwrap());
    }

    #[test]
    fn test_save_upconverts_legacy_records() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("transactions.yaml"),
            "- date: 2020-01-01\n  from: Ext.Bob\n  to: Assets.Bank\n  amount: 1000.0\n",
        )
        .unwrap();

        repo.load().unwrap();
        repo.save().unwrap();

        let text = std::fs::read_to_string(temp_dir.path().join("transactions.yaml")).unwrap();
        assert!(text.contains("transfers:"));
        assert!(!text.contains("from:"));
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("transactions.yaml"),
            "- date: 2020-01-01\n  transfers:\n    Assets: 10\n    Expenses: 5\n",
        )
        .unwrap();

        assert!(repo.load().is_err());
    }
}
