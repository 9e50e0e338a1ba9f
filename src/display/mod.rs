//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger data for terminal display.
//! Amounts are rounded to two decimals here and nowhere else.

pub mod balance;
pub mod invoice;
pub mod transaction;

pub use balance::{format_balance_json, format_balance_report};
pub use invoice::{format_invoice_details, format_invoice_list};
pub use transaction::{format_transaction_lines, format_transactions_yaml};
