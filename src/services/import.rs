//! Statement import service
//!
//! Parses a bank statement with the importer of the bank and appends the
//! resulting transactions to the end of the transaction log.

use std::path::Path;

use chrono::Local;

use crate::error::{WimmError, WimmResult};
use crate::import::{importer_for, SUPPORTED_BANKS};
use crate::models::{AccountName, TransactionLog};
use crate::storage::Storage;

/// Result of a completed import
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Account the statement was booked against
    pub account: AccountName,
    /// Number of transactions appended
    pub imported: usize,
}

/// Service for bank statement import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a statement without touching the ledger
    pub fn preview(
        &self,
        bank: &str,
        file: &Path,
        account: Option<AccountName>,
    ) -> WimmResult<(AccountName, TransactionLog)> {
        let importer = importer_for(bank).ok_or_else(|| {
            WimmError::Import(format!(
                "Import for {} not supported. Supported options are {:?}",
                bank, SUPPORTED_BANKS
            ))
        })?;

        if !file.exists() {
            return Err(WimmError::Import(format!("File not found: {}", file.display())));
        }

        let account = match account {
            Some(account) => account,
            None => AccountName::parse(importer.default_account())?,
        };

        let transactions = importer.import_file(file, &account)?;
        Ok((account, transactions))
    }

    /// Import a statement and append it to the transaction log
    ///
    /// The appended block is headed by an `---IMPORT---` comment naming the
    /// time and source file.
    pub fn import_statement(
        &self,
        bank: &str,
        file: &Path,
        account: Option<AccountName>,
    ) -> WimmResult<ImportResult> {
        let (account, transactions) = self.preview(bank, file, account)?;
        let imported = transactions.len();

        if imported == 0 {
            tracing::warn!("No transactions found in {}", file.display());
        } else {
            let comment = format!(
                "---IMPORT--- at {} file: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                file.display()
            );
            self.storage
                .transactions
                .append(transactions.into_iter().collect(), &comment)?;
            tracing::info!("Imported {} transactions into {}", imported, account);
        }

        Ok(ImportResult { account, imported })
    }
}
