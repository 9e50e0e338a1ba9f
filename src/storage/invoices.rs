//! Invoice repository for YAML storage
//!
//! Manages loading and saving the invoice log in invoices.yaml

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::WimmError;
use crate::models::{Invoice, InvoiceLog};

use super::file_io::{append_yaml, read_yaml, write_yaml_atomic};

/// Repository for invoice persistence
pub struct InvoiceRepository {
    path: PathBuf,
    data: RwLock<InvoiceLog>,
}

impl InvoiceRepository {
    /// Create a new invoice repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(InvoiceLog::new()),
        }
    }

    /// Load invoices from disk
    pub fn load(&self) -> Result<(), WimmError> {
        let log: InvoiceLog = read_yaml(&self.path)?;
        tracing::debug!("Loaded {} invoices from {}", log.len(), self.path.display());

        let mut data = self.data.write().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = log;
        Ok(())
    }

    /// Save invoices to disk
    pub fn save(&self) -> Result<(), WimmError> {
        let data = self.data.read().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_yaml_atomic(&self.path, &*data)
    }

    /// Get a copy of the whole invoice log
    pub fn get_all(&self) -> Result<InvoiceLog, WimmError> {
        let data = self.data.read().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Append one invoice to the log and to the end of the file
    pub fn append(&self, invoice: Invoice, comment: &str) -> Result<(), WimmError> {
        append_yaml(&self.path, std::slice::from_ref(&invoice), comment)?;

        let mut data = self.data.write().map_err(|e| {
            WimmError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.push(invoice);
        Ok(())
    }

    /// Count invoices
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
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, InvoiceRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invoices.yaml");
        let repo = InvoiceRepository::new(path);
        (temp_dir, repo)
    }

    fn invoice(id: &str) -> Invoice {
        Invoice::new(id, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(), Money::from_units(70)).unwrap()
    }

    #[test]
    fn test_append_and_reload() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.append(invoice("INR20_001"), "added").unwrap();
        repo.append(invoice("INR20_002"), "added").unwrap();

        let reloaded = InvoiceRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
        assert_eq!(reloaded.get_all().unwrap(), repo.get_all().unwrap());
    }

    #[test]
    fn test_load_normalizes_legacy_ids() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("invoices.yaml"),
            "- id: INS20.007\n  date: '2020-02-02'\n  amount: 10\n",
        )
        .unwrap();

        repo.load().unwrap();
        repo.save().unwrap();

        let reloaded = InvoiceRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert!(reloaded.get_all().unwrap().get("INS20_007").is_ok());
    }

    #[test]
    fn test_load_rejects_malformed_id() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("invoices.yaml"),
            "- id: INS20-007\n  date: '2020-02-02'\n",
        )
        .unwrap();

        assert!(repo.load().is_err());
    }
}
