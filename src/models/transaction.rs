//! Transaction model
//!
//! A transaction is a dated set of transfers between accounts. The amounts of
//! one transaction always sum to zero: money leaves some accounts and arrives
//! in others. One leg may be left open when the transaction is written down;
//! it is solved as the negated sum of the other legs.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use rust_decimal::Decimal;

use super::account_name::AccountName;
use super::money::Money;
use crate::error::{WimmError, WimmResult};

/// Largest residue a transfer set may leave and still count as balanced
///
/// Ledger files written by float-based tools can carry residues such as
/// `5.551115123125783e-17` in otherwise balanced sets.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// The resolved legs of one transaction, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transfers(IndexMap<AccountName, Money>);

impl Transfers {
    /// Resolve a set of legs where at most one amount may be unknown
    ///
    /// # Errors
    ///
    /// Returns a validation error if two or more amounts are missing, or if
    /// all amounts are given and they do not sum to zero.
    pub fn resolve<I>(legs: I) -> WimmResult<Self>
    where
        I: IntoIterator<Item = (AccountName, Option<Money>)>,
    {
        let mut resolved = IndexMap::new();
        let mut missing: Option<AccountName> = None;

        for (account, amount) in legs {
            match amount {
                Some(amount) => {
                    resolved.insert(account, amount);
                }
                None => {
                    if missing.is_some() {
                        return Err(WimmError::Validation(
                            "More than one entry is missing".into(),
                        ));
                    }
                    // keep the open leg at its written position
                    resolved.insert(account.clone(), Money::zero());
                    missing = Some(account);
                }
            }
        }

        if let Some(account) = missing {
            let others: Money = resolved.values().sum();
            resolved.insert(account, -others);
        }

        let transfers = Self(resolved);
        transfers.check_balance()?;
        Ok(transfers)
    }

    /// Resolve fully specified legs, netting legs that share an account
    ///
    /// `{A: -5}` and `{A: +5}` become one leg `{A: 0}`.
    pub fn netted<I>(legs: I) -> WimmResult<Self>
    where
        I: IntoIterator<Item = (AccountName, Money)>,
    {
        let mut netted: IndexMap<AccountName, Money> = IndexMap::new();
        for (account, amount) in legs {
            *netted.entry(account).or_default() += amount;
        }
        let transfers = Self(netted);
        transfers.check_balance()?;
        Ok(transfers)
    }

    /// Whether the legs sum to zero within `BALANCE_TOLERANCE`
    pub fn is_balanced(&self) -> bool {
        self.sum().is_near_zero(BALANCE_TOLERANCE)
    }

    fn check_balance(&self) -> WimmResult<()> {
        if self.is_balanced() {
            Ok(())
        } else {
            Err(WimmError::Validation(format!(
                "Transfers do not balance: {} is off by {}",
                self,
                self.sum().amount()
            )))
        }
    }

    /// Resolve a set of fully specified legs
    pub fn balanced<I>(legs: I) -> WimmResult<Self>
    where
        I: IntoIterator<Item = (AccountName, Money)>,
    {
        Self::resolve(legs.into_iter().map(|(a, m)| (a, Some(m))))
    }

    /// Merge another transfer set into this one
    ///
    /// A colliding account takes the value from `other`; amounts are not
    /// summed. The result is re-checked for balance.
    pub fn merged(&self, other: &Transfers) -> WimmResult<Self> {
        let mut legs = self.0.clone();
        for (account, amount) in other.iter() {
            legs.insert(account.clone(), *amount);
        }
        Self::balanced(legs)
    }

    /// Sum of all legs (zero for a valid set)
    pub fn sum(&self) -> Money {
        self.0.values().sum()
    }

    /// Amount posted to an account, if it takes part
    pub fn get(&self, account: &AccountName) -> Option<Money> {
        self.0.get(account).copied()
    }

    /// Iterate over legs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&AccountName, &Money)> {
        self.0.iter()
    }

    /// Accounts taking part, in insertion order
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

impl fmt::Display for Transfers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let legs: Vec<String> = self
            .0
            .iter()
            .map(|(account, amount)| format!("{}: {}", account, amount))
            .collect();
        write!(f, "{{{}}}", legs.join(", "))
    }
}

/// A single account movement, the flattened form of one transfer leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub date: NaiveDate,
    pub account: AccountName,
    pub amount: Money,
}

/// A dated, described set of transfers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionDocument")]
pub struct Transaction {
    /// Booking date
    pub date: NaiveDate,

    /// Free-text description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Balanced transfer legs
    pub transfers: Transfers,
}

impl Transaction {
    /// Create a transaction from legs where at most one amount may be open
    pub fn new<I>(date: NaiveDate, description: impl Into<String>, legs: I) -> WimmResult<Self>
    where
        I: IntoIterator<Item = (AccountName, Option<Money>)>,
    {
        Ok(Self::with_transfers(
            date,
            description,
            Transfers::resolve(legs)?,
        ))
    }

    /// Create a transaction from an already validated transfer set
    pub fn with_transfers(
        date: NaiveDate,
        description: impl Into<String>,
        transfers: Transfers,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            transfers,
        }
    }

    /// Create a simple two-party transaction moving `amount` from `from` to `to`
    pub fn transfer(
        date: NaiveDate,
        description: impl Into<String>,
        from: AccountName,
        to: AccountName,
        amount: Money,
    ) -> WimmResult<Self> {
        Self::from_legacy(LegacyTransaction {
            date,
            description: Some(description.into()),
            from,
            to,
            amount,
            category: None,
        })
    }

    /// Convert a legacy two-party record into the transfer form
    ///
    /// `{from, to, amount}` becomes `{from: -amount, to: +amount}`; with
    /// `from == to` the two legs net to `{from: 0}`. Ledger files written
    /// before transfer sets existed use this shape, so the conversion is
    /// applied every time such a record is loaded.
    pub fn from_legacy(legacy: LegacyTransaction) -> WimmResult<Self> {
        let transfers = Transfers::netted([
            (legacy.from, -legacy.amount),
            (legacy.to, legacy.amount),
        ])?;
        Ok(Self::with_transfers(
            legacy.date,
            legacy.description.unwrap_or_default(),
            transfers,
        ))
    }

    /// Flatten into one posting per transfer leg
    pub fn to_records(&self) -> Vec<Posting> {
        self.transfers
            .iter()
            .map(|(account, amount)| Posting {
                date: self.date,
                account: account.clone(),
                amount: *amount,
            })
            .collect()
    }

    /// Check the transfer set again after a caller-level edit
    pub fn validate(&self) -> WimmResult<()> {
        if self.transfers.is_balanced() {
            Ok(())
        } else {
            Err(WimmError::Validation(format!(
                "Transaction on {} does not balance: off by {}",
                self.date,
                self.transfers.sum().amount()
            )))
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.transfers
        )
    }
}

/// Account reference as found in legacy records
///
/// Old files hold either a plain account string or a mapping carrying the
/// account plus counterparty details (`{account: Ext.Bob, name: Bob}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AccountRef {
    Name(String),
    Detailed { account: String },
}

impl TryFrom<AccountRef> for AccountName {
    type Error = WimmError;

    fn try_from(r: AccountRef) -> Result<Self, Self::Error> {
        match r {
            AccountRef::Name(name) | AccountRef::Detailed { account: name } => {
                AccountName::parse(&name)
            }
        }
    }
}

/// A two-party transaction in the original flat schema
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LegacyDocument")]
pub struct LegacyTransaction {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Money,
    /// Kept for reading old files; transfer sets have no category
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyDocument {
    date: NaiveDate,
    #[serde(default)]
    description: Option<String>,
    from: AccountRef,
    to: AccountRef,
    amount: Money,
    #[serde(default)]
    category: Option<String>,
}

impl TryFrom<LegacyDocument> for LegacyTransaction {
    type Error = WimmError;

    fn try_from(doc: LegacyDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            date: doc.date,
            description: doc.description,
            from: doc.from.try_into()?,
            to: doc.to.try_into()?,
            amount: doc.amount,
            category: doc.category,
        })
    }
}

/// Any transaction shape found on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransactionDocument {
    Current {
        date: NaiveDate,
        #[serde(default)]
        description: Option<String>,
        transfers: IndexMap<String, Option<Money>>,
    },
    Legacy(LegacyDocument),
}

impl TryFrom<TransactionDocument> for Transaction {
    type Error = WimmError;

    fn try_from(doc: TransactionDocument) -> Result<Self, Self::Error> {
        match doc {
            TransactionDocument::Current {
                date,
                description,
                transfers,
            } => {
                let legs = transfers
                    .into_iter()
                    .map(|(account, amount)| Ok((AccountName::parse(&account)?, amount)))
                    .collect::<WimmResult<Vec<_>>>()?;
                Self::new(date, description.unwrap_or_default(), legs)
            }
            TransactionDocument::Legacy(legacy) => Self::from_legacy(legacy.try_into()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn acct(s: &str) -> AccountName {
        AccountName::parse(s).unwrap()
    }

    #[test]
    fn test_missing_leg_is_inferred() {
        let txn = Transaction::new(
            date(2020, 1, 2),
            "split purchase",
            [
                (acct("Expenses.Office"), Some(Money::from_units(30))),
                (acct("Assets.Bank"), None),
                (acct("Expenses.Food"), Some(Money::from_units(20))),
            ],
        )
        .unwrap();

        assert_eq!(txn.transfers.get(&acct("Assets.Bank")), Some(Money::from_units(-50)));
        assert!(txn.transfers.sum().is_zero());
        // open leg keeps its position
        let order: Vec<String> = txn.transfers.accounts().map(|a| a.to_string()).collect();
        assert_eq!(order, vec!["Expenses.Office", "Assets.Bank", "Expenses.Food"]);
    }

    #[test]
    fn test_two_missing_legs_fail() {
        let result = Transaction::new(
            date(2020, 1, 2),
            "",
            [
                (acct("Assets.Bank"), None),
                (acct("Expenses"), None),
                (acct("Ext.Bob"), Some(Money::from_units(10))),
            ],
        );
        let err = result.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("More than one entry is missing"));
    }

    #[test]
    fn test_unbalanced_legs_fail() {
        let result = Transfers::balanced([
            (acct("Assets.Bank"), Money::from_units(10)),
            (acct("Expenses"), Money::from_units(-9)),
        ]);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_from_legacy() {
        let legacy = LegacyTransaction {
            date: date(2020, 1, 3),
            description: Some("Borrowed some money from Bob".into()),
            from: acct("Liabilities"),
            to: acct("Assets.Bank"),
            amount: Money::from_units(150),
            category: None,
        };
        let txn = Transaction::from_legacy(legacy).unwrap();

        assert_eq!(txn.transfers.get(&acct("Liabilities")), Some(Money::from_units(-150)));
        assert_eq!(txn.transfers.get(&acct("Assets.Bank")), Some(Money::from_units(150)));
        assert_eq!(txn.description, "Borrowed some money from Bob");
    }

    #[test]
    fn test_to_records() {
        let txn = Transaction::transfer(
            date(2020, 1, 1),
            "paid",
            acct("Ext.Bob"),
            acct("Assets.Bank"),
            Money::from_units(1000),
        )
        .unwrap();

        let records = txn.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].account, acct("Ext.Bob"));
        assert_eq!(records[0].amount, Money::from_units(-1000));
        assert_eq!(records[1].date, date(2020, 1, 1));
    }

    #[test]
    fn test_merge_overwrites_colliding_account() {
        let a = Transfers::balanced([
            (acct("Ext.Bob"), Money::from_units(-100)),
            (acct("Assets.Bank"), Money::from_units(100)),
        ])
        .unwrap();
        let b = Transfers::balanced([
            (acct("Ext.Tax"), Money::from_units(-21)),
            (acct("Tax.to_receive"), Money::from_units(21)),
        ])
        .unwrap();

        let merged = a.merged(&b).unwrap();
        assert_eq!(merged.len(), 4);

        let colliding = Transfers::balanced([
            (acct("Ext.Bob"), Money::from_units(-21)),
            (acct("Assets.Bank"), Money::from_units(21)),
        ])
        .unwrap();
        let merged = a.merged(&colliding).unwrap();
        assert_eq!(merged.get(&acct("Assets.Bank")), Some(Money::from_units(21)));
    }

    #[test]
    fn test_deserialize_current_schema() {
        let yaml = "date: 2020-01-02\ndescription: bought some pens\ntransfers:\n  Assets.Bank: -50.0\n  Expenses: ~\n";
        let txn: Transaction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(txn.transfers.get(&acct("Expenses")), Some(Money::from_units(50)));
        assert_eq!(txn.description, "bought some pens");
    }

    #[test]
    fn test_deserialize_legacy_schema_with_detailed_account() {
        let yaml = "date: '2020-01-01'\nfrom:\n  account: Ext.Bob\n  name: Bob\n  iban: 12345\nto: Assets.bank\namount: 1000.0\ndescription: Customer paid invoice\n";
        let txn: Transaction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(txn.transfers.get(&acct("Ext.Bob")), Some(Money::from_units(-1000)));
        assert_eq!(txn.transfers.get(&acct("Assets.bank")), Some(Money::from_units(1000)));
    }

    #[test]
    fn test_sub_cent_legs_balance() {
        let yaml = "date: 2020-01-02\ntransfers:\n  A: 0.333\n  B: 0.333\n  C: -0.666\n";
        let txn: Transaction = serde_yaml::from_str(yaml).unwrap();
        assert!(txn.transfers.sum().is_zero());
        assert_eq!(txn.transfers.get(&acct("C")), Some(Money::parse("-0.666").unwrap()));
    }

    #[test]
    fn test_sub_cent_legs_survive_save() {
        let yaml = "date: 2020-01-02\ntransfers:\n  A: 0.004\n  B: -0.004\n";
        let txn: Transaction = serde_yaml::from_str(yaml).unwrap();

        let saved = serde_yaml::to_string(&txn).unwrap();
        assert!(saved.contains("A: 0.004"));
        assert_eq!(serde_yaml::from_str::<Transaction>(&saved).unwrap(), txn);
    }

    #[test]
    fn test_float_residue_within_tolerance() {
        let yaml = "date: 2020-01-02\ntransfers:\n  A: 0.1\n  B: 0.2\n  C: -0.30000000000000004\n";
        assert!(serde_yaml::from_str::<Transaction>(yaml).is_ok());

        let yaml = "date: 2020-01-02\ntransfers:\n  A: 0.1\n  C: -0.11\n";
        assert!(serde_yaml::from_str::<Transaction>(yaml).is_err());
    }

    #[test]
    fn test_legacy_self_transfer_nets_to_zero() {
        let yaml = "date: 2020-01-01\nfrom: Assets\nto: Assets\namount: 5\n";
        let txn: Transaction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(txn.transfers.len(), 1);
        assert_eq!(txn.transfers.get(&acct("Assets")), Some(Money::zero()));
    }

    #[test]
    fn test_transfer_to_same_account() {
        let txn = Transaction::transfer(
            date(2020, 1, 1),
            "",
            AccountName::uncategorized(),
            AccountName::uncategorized(),
            Money::from_units(100),
        )
        .unwrap();
        assert!(txn.validate().is_ok());
        assert_eq!(txn.transfers.get(&AccountName::uncategorized()), Some(Money::zero()));
    }

    #[test]
    fn test_deserialize_rejects_two_open_legs() {
        let yaml = "date: 2020-01-02\ntransfers:\n  Assets.Bank: ~\n  Expenses: ~\n";
        assert!(serde_yaml::from_str::<Transaction>(yaml).is_err());
    }

    #[test]
    fn test_serialize_preserves_order_and_skips_empty_description() {
        let txn = Transaction::new(
            date(2020, 1, 2),
            "",
            [
                (acct("Zeta"), Some(Money::from_units(5))),
                (acct("Alpha"), None),
            ],
        )
        .unwrap();

        let yaml = serde_yaml::to_string(&txn).unwrap();
        assert!(!yaml.contains("description"));
        assert!(yaml.find("Zeta").unwrap() < yaml.find("Alpha").unwrap());

        let back: Transaction = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, txn);
    }
}
