//! Invoice log
//!
//! Ordered collection of invoices as stored in `invoices.yaml`.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::account_name::AccountName;
use super::balances::Balances;
use super::invoice::{validate_id, Invoice, InvoiceField};
use super::money::Money;
use super::transaction_log::TransactionLog;
use crate::config::Settings;
use crate::error::{WimmError, WimmResult};

/// Trailing character of a prefix pattern (`INS*`)
pub const WILDCARD: char = '*';

/// Ordered sequence of invoices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceLog {
    invoices: Vec<Invoice>,
}

impl InvoiceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, invoice: Invoice) {
        self.invoices.push(invoice);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Invoice> {
        self.invoices.iter()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Find the first invoice with exactly this id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no invoice has the id.
    pub fn get(&self, id: &str) -> WimmResult<&Invoice> {
        self.invoices
            .iter()
            .find(|inv| inv.id == id)
            .ok_or_else(|| WimmError::invoice_not_found(id))
    }

    /// Look invoices up by id or by prefix pattern
    ///
    /// A pattern ending in `*` matches every id starting with the text before
    /// it and returns the matches sorted by id (possibly none). Any other
    /// pattern is an exact lookup returning one invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when an exact lookup finds nothing.
    pub fn get_by_id(&self, pattern: &str) -> WimmResult<Vec<&Invoice>> {
        match pattern.strip_suffix(WILDCARD) {
            Some(prefix) => {
                let mut matches: Vec<&Invoice> = self
                    .invoices
                    .iter()
                    .filter(|inv| inv.id.starts_with(prefix))
                    .collect();
                matches.sort_by(|a, b| a.id.cmp(&b.id));
                Ok(matches)
            }
            None => self.get(pattern).map(|inv| vec![inv]),
        }
    }

    /// Next free id for a prefix, dated with the current year
    pub fn get_next_id(&self, prefix: &str) -> WimmResult<String> {
        self.next_id_for_year(prefix, Local::now().year())
    }

    /// Next free id for a prefix
    ///
    /// Takes the greatest existing id starting with `prefix` and increments
    /// its sequence, keeping the zero-padded width. Without a match the
    /// sequence starts at `001` in `year`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the greatest id is malformed or the
    /// incremented sequence no longer fits its width.
    pub fn next_id_for_year(&self, prefix: &str, year: i32) -> WimmResult<String> {
        let last = self
            .invoices
            .iter()
            .map(|inv| inv.id.as_str())
            .filter(|id| id.starts_with(prefix))
            .max();

        let Some(last) = last else {
            let id = format!("{}{:02}_001", prefix, year.rem_euclid(100));
            validate_id(&id)?;
            return Ok(id);
        };

        let (head, sequence) = last.rsplit_once('_').ok_or_else(|| {
            WimmError::Validation(format!("Invoice id '{}' has no sequence number", last))
        })?;
        let number: u32 = sequence.parse().map_err(|_| {
            WimmError::Validation(format!("Invoice id '{}' has a non-numeric sequence", last))
        })?;

        let width = sequence.len();
        let next = format!("{:0width$}", number + 1, width = width);
        if next.len() > width {
            return Err(WimmError::Validation(format!(
                "Invoice sequence of '{}' exhausted: {} does not fit in {} digits",
                last, next, width
            )));
        }

        Ok(format!("{}_{}", head, next))
    }

    /// Invoices sorted by a field; equal keys keep their log order
    pub fn get_sorted_by(&self, field: InvoiceField, reverse: bool) -> Vec<&Invoice> {
        let mut sorted: Vec<&Invoice> = self.invoices.iter().collect();
        if reverse {
            sorted.sort_by(|a, b| field.compare(b, a));
        } else {
            sorted.sort_by(|a, b| field.compare(a, b));
        }
        sorted
    }

    /// Settlement transactions of every invoice, in log order
    pub fn to_transactions(&self, settings: &Settings) -> WimmResult<TransactionLog> {
        self.invoices
            .iter()
            .map(|inv| inv.transaction(settings))
            .collect()
    }

    /// Outstanding amounts keyed by invoice id, plus tax totals
    ///
    /// `tax.to_receive` sums the positive taxes and `tax.to_pay` the negative
    /// ones. Invoices sharing an id are summed.
    pub fn to_balances(&self) -> WimmResult<Balances> {
        let mut balances = Balances::new();
        for invoice in &self.invoices {
            balances.credit(AccountName::parse(&invoice.id)?, invoice.amount);
        }

        let to_receive: Money = self
            .invoices
            .iter()
            .map(|inv| inv.tax)
            .filter(|tax| tax.is_positive())
            .sum();
        let to_pay: Money = self
            .invoices
            .iter()
            .map(|inv| inv.tax)
            .filter(|tax| tax.is_negative())
            .sum();

        balances.credit(AccountName::parse("tax.to_receive")?, to_receive);
        balances.credit(AccountName::parse("tax.to_pay")?, to_pay);
        Ok(balances)
    }
}

impl FromIterator<Invoice> for InvoiceLog {
    fn from_iter<I: IntoIterator<Item = Invoice>>(iter: I) -> Self {
        Self {
            invoices: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Invoice>> for InvoiceLog {
    fn from(invoices: Vec<Invoice>) -> Self {
        Self { invoices }
    }
}

impl<'a> IntoIterator for &'a InvoiceLog {
    type Item = &'a Invoice;
    type IntoIter = std::slice::Iter<'a, Invoice>;

    fn into_iter(self) -> Self::IntoIter {
        self.invoices.iter()
    }
}
