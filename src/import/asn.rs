//! ASN Bank statement importer
//!
//! ASN exports a headerless comma separated file with 19 columns per row.
//! Only the booking date, counterparty name, amount and description are
//! used.

use std::io::Read;

use csv::ReaderBuilder;

use super::{external_account, parse_statement_date, StatementImporter};
use crate::error::{WimmError, WimmResult};
use crate::models::{AccountName, Money, Transaction, TransactionLog};

const COLUMN_COUNT: usize = 19;
const DATE_COLUMN: usize = 0;
const NAME_COLUMN: usize = 3;
const AMOUNT_COLUMN: usize = 10;
const DESCRIPTION_COLUMN: usize = 17;

/// Importer for ASN Bank CSV statements
#[derive(Debug, Clone, Copy, Default)]
pub struct AsnImporter;

impl StatementImporter for AsnImporter {
    fn bank(&self) -> &'static str {
        "ASN"
    }

    fn default_account(&self) -> &'static str {
        "Assets.Bank.ASN"
    }

    fn parse(&self, reader: &mut dyn Read, account: &AccountName) -> WimmResult<TransactionLog> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut log = TransactionLog::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() < COLUMN_COUNT {
                tracing::warn!(
                    "ASN row {}: expected {} columns, found {}; skipped",
                    row + 1,
                    COLUMN_COUNT,
                    record.len()
                );
                continue;
            }

            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let date = parse_statement_date(field(DATE_COLUMN))?;
            let amount = Money::parse(field(AMOUNT_COLUMN)).map_err(|e| {
                WimmError::Import(format!("ASN row {}: {}", row + 1, e))
            })?;
            let description = field(DESCRIPTION_COLUMN).trim().trim_matches('\'');
            let counterparty = external_account(field(NAME_COLUMN))?;

            log.push(Transaction::new(
                date,
                description,
                [(account.clone(), Some(amount)), (counterparty, Some(-amount))],
            )?);
        }

        Ok(log)
    }
}
