//! Transaction log
//!
//! The ordered history of all transactions. Balances are never stored
//! separately; they are recomputed by replaying the log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::balances::Balances;
use super::transaction::{Posting, Transaction};
use crate::error::WimmResult;

/// Ordered sequence of transactions, in append order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction at the end of the log
    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Append every transaction of another log
    pub fn extend(&mut self, other: TransactionLog) {
        self.transactions.extend(other.transactions);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All postings of all transactions, in log order
    pub fn to_records(&self) -> impl Iterator<Item = Posting> + '_ {
        self.transactions.iter().flat_map(Transaction::to_records)
    }

    /// Transactions dated within `[start, end)`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> TransactionLog {
        self.transactions
            .iter()
            .filter(|t| t.date >= start && t.date < end)
            .cloned()
            .collect()
    }

    /// Replay the log onto an existing set of balances
    ///
    /// Every posting adds its amount to the account. With `auto_create`
    /// unknown accounts are opened at zero; without it the first unknown
    /// account aborts the replay with `AccountNotFound` and `balances` is
    /// left partially applied.
    pub fn apply(&self, balances: &mut Balances, auto_create: bool) -> WimmResult<()> {
        for posting in self.to_records() {
            if auto_create {
                balances.credit(posting.account, posting.amount);
            } else {
                balances.credit_existing(&posting.account, posting.amount)?;
            }
        }
        Ok(())
    }

    /// Accounts and their balances, keyed by full account name
    pub fn process(&self) -> Balances {
        self.to_records().map(|p| (p.account, p.amount)).collect()
    }
}

impl FromIterator<Transaction> for TransactionLog {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self {
            transactions: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Transaction>> for TransactionLog {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl IntoIterator for TransactionLog {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
