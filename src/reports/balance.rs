//! Balance Report
//!
//! Replays the transaction log on top of the starting balances and, on
//! request, the invoice balances, then rolls the result up to a depth.

use crate::error::WimmResult;
use crate::models::{Balances, InvoiceLog, Money, TransactionLog};
use crate::storage::Storage;

/// Compute per-account balances
///
/// 1. balances of the transaction log (`process`)
/// 2. plus the starting balances, accounts missing on either side count as 0
/// 3. plus the invoice balances, same join
/// 4. with a depth, every account truncated to its first `depth` segments and
///    the groups summed; a depth of 0 is treated as 1
pub fn balance(
    transactions: &TransactionLog,
    start_balance: Option<&Balances>,
    invoices: Option<&InvoiceLog>,
    depth: Option<usize>,
) -> WimmResult<Balances> {
    let mut accounts = transactions.process();

    if let Some(start) = start_balance {
        accounts = accounts.add(start);
    }

    if let Some(invoices) = invoices {
        accounts = accounts.add(&invoices.to_balances()?);
    }

    Ok(match depth {
        Some(depth) => accounts.rollup(depth),
        None => accounts,
    })
}

/// Options for generating a balance report
#[derive(Debug, Clone, Default)]
pub struct BalanceOptions {
    /// Roll accounts up to this many segments
    pub depth: Option<usize>,
    /// Drop accounts with a zero balance
    pub hide_zeros: bool,
    /// Add the invoice balances
    pub with_invoices: bool,
}

/// Balance Report
#[derive(Debug, Clone)]
pub struct BalanceReport {
    /// Balance per (rolled-up) account
    pub balances: Balances,
    /// Sum over all rows
    pub total: Money,
    pub options: BalanceOptions,
}

impl BalanceReport {
    /// Generate the report from loaded storage
    pub fn generate(storage: &Storage, options: BalanceOptions) -> WimmResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let start = storage.balances.load()?;
        let invoices = if options.with_invoices {
            Some(storage.invoices.get_all()?)
        } else {
            None
        };

        Self::from_parts(&transactions, start.as_ref(), invoices.as_ref(), options)
    }

    /// Build the report from in-memory data
    pub fn from_parts(
        transactions: &TransactionLog,
        start_balance: Option<&Balances>,
        invoices: Option<&InvoiceLog>,
        options: BalanceOptions,
    ) -> WimmResult<Self> {
        let mut balances = balance(transactions, start_balance, invoices, options.depth)?;
        if options.hide_zeros {
            balances = balances.without_zeros();
        }
        let total = balances.total();

        Ok(Self {
            balances,
            total,
            options,
        })
    }

    /// Number of rows in the report
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }
}
