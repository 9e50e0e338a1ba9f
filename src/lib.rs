//! wimm - plain-text double-entry bookkeeping
//!
//! This library provides the core functionality of the `wimm` ledger. A
//! company's books are kept in hand-editable YAML files: a transaction log,
//! an invoice log and a starting balance snapshot. Every transaction is a
//! set of transfers between hierarchical accounts (`Assets.Bank`) that sums
//! to zero; balances are always recomputed by replaying the log.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and settings
//! - `error`: Custom error types
//! - `models`: Accounts, amounts, transactions, invoices and balances
//! - `storage`: YAML file storage layer
//! - `reports`: Balance report
//! - `services`: Invoice booking and statement import
//! - `import`: Bank statement parsers
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `wimm` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use wimm::config::{paths::WimmPaths, settings::Settings};
//! use wimm::reports::{BalanceOptions, BalanceReport};
//! use wimm::storage::Storage;
//!
//! let paths = WimmPaths::new()?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let report = BalanceReport::generate(&storage, BalanceOptions::default())?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{WimmError, WimmResult};
