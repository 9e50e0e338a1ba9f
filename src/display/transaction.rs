//! Transaction display formatting
//!
//! Transactions are shown in the same YAML form they are stored in.

use crate::error::WimmResult;
use crate::models::TransactionLog;
use crate::storage::file_io::to_yaml_string;

/// Format a transaction log as YAML
pub fn format_transactions_yaml(log: &TransactionLog) -> WimmResult<String> {
    if log.is_empty() {
        return Ok("No transactions found.\n".to_string());
    }
    to_yaml_string(log)
}

/// Format a transaction log one transaction per line
pub fn format_transaction_lines(log: &TransactionLog) -> String {
    log.iter().map(|txn| format!("{}\n", txn)).collect()
}
