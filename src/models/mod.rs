//! Core data models for wimm
//!
//! This module contains the data structures of the ledger: account names,
//! amounts, transactions, invoices and the balances derived from them.

pub mod account_name;
pub mod balances;
pub mod invoice;
pub mod invoice_log;
pub mod money;
pub mod transaction;
pub mod transaction_log;

pub use account_name::AccountName;
pub use balances::Balances;
pub use invoice::{Invoice, InvoiceField};
pub use invoice_log::InvoiceLog;
pub use money::Money;
pub use transaction::{LegacyTransaction, Posting, Transaction, Transfers};
pub use transaction_log::TransactionLog;
