//! Reports module for wimm
//!
//! Derived views of the ledger. Reports never modify storage.

pub mod balance;

pub use balance::{balance, BalanceOptions, BalanceReport};
