//! Per-account balances
//!
//! The derived view of the ledger: every account with its running total.
//! The same shape is persisted as the starting-balance snapshot.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

use super::account_name::AccountName;
use super::money::Money;
use crate::error::{WimmError, WimmResult};

/// Mapping of full account name to balance, ordered by account name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<AccountName, Money>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the given accounts with a zero balance
    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = AccountName>,
    {
        Self(accounts.into_iter().map(|a| (a, Money::zero())).collect())
    }

    /// Balance of an account, zero when it has no entry
    pub fn get(&self, account: &AccountName) -> Money {
        self.0.get(account).copied().unwrap_or_default()
    }

    pub fn contains(&self, account: &AccountName) -> bool {
        self.0.contains_key(account)
    }

    /// Set the balance of an account
    pub fn insert(&mut self, account: AccountName, amount: Money) {
        self.0.insert(account, amount);
    }

    /// Add to an account, creating it at zero first if needed
    pub fn credit(&mut self, account: AccountName, amount: Money) {
        *self.0.entry(account).or_default() += amount;
    }

    /// Add to an account that must already exist
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account has no entry.
    pub fn credit_existing(&mut self, account: &AccountName, amount: Money) -> WimmResult<()> {
        match self.0.get_mut(account) {
            Some(balance) => {
                *balance += amount;
                Ok(())
            }
            None => Err(WimmError::AccountNotFound(account.to_string())),
        }
    }

    /// Element-wise sum; accounts missing on either side count as zero
    pub fn add(&self, other: &Balances) -> Balances {
        let mut out = self.clone();
        for (account, amount) in other.iter() {
            out.credit(account.clone(), *amount);
        }
        out
    }

    /// Re-key every account to its first `depth` segments and sum the groups
    ///
    /// With `depth = 1`, `Assets.Bank` and `Assets.Cash` both land on
    /// `Assets`.
    pub fn rollup(&self, depth: usize) -> Balances {
        let mut out = Balances::new();
        for (account, amount) in self.iter() {
            out.credit(account.truncate(depth), *amount);
        }
        out
    }

    /// Drop accounts whose balance is zero
    pub fn without_zeros(&self) -> Balances {
        Self(
            self.0
                .iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(a, m)| (a.clone(), *m))
                .collect(),
        )
    }

    /// Sum over all accounts (zero for a closed double-entry ledger)
    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AccountName, Money> {
        self.0.iter()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &AccountName> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AccountName, Money)> for Balances {
    fn from_iter<I: IntoIterator<Item = (AccountName, Money)>>(iter: I) -> Self {
        let mut out = Balances::new();
        for (account, amount) in iter {
            out.credit(account, amount);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a AccountName, &'a Money);
    type IntoIter = btree_map::Iter<'a, AccountName, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
