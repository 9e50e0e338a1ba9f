//! KNAB statement importer
//!
//! KNAB exports `;` separated files with a decimal comma. The first line is
//! a title line, the second the column header. The amount column is always
//! positive; `CreditDebet` tells the direction.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use super::{external_account, parse_statement_date, StatementImporter};
use crate::error::{WimmError, WimmResult};
use crate::models::{AccountName, Money, Transaction, TransactionLog};

const DATE_HEADER: &str = "Transactiedatum";
const AMOUNT_HEADER: &str = "Bedrag";
const DESCRIPTION_HEADER: &str = "Omschrijving";
const DIRECTION_HEADER: &str = "CreditDebet";
const COUNTERPARTY_HEADER: &str = "Tegenrekeninghouder";

/// Importer for KNAB CSV statements
#[derive(Debug, Clone, Copy, Default)]
pub struct KnabImporter;

struct Columns {
    date: usize,
    amount: usize,
    description: usize,
    direction: usize,
    counterparty: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> WimmResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| WimmError::Import(format!("KNAB statement has no '{}' column", name)))
        };

        Ok(Self {
            date: find(DATE_HEADER)?,
            amount: find(AMOUNT_HEADER)?,
            description: find(DESCRIPTION_HEADER)?,
            direction: find(DIRECTION_HEADER)?,
            counterparty: find(COUNTERPARTY_HEADER)?,
        })
    }
}

impl StatementImporter for KnabImporter {
    fn bank(&self) -> &'static str {
        "KNAB"
    }

    fn default_account(&self) -> &'static str {
        "Assets.Bank.KNAB"
    }

    fn parse(&self, reader: &mut dyn Read, account: &AccountName) -> WimmResult<TransactionLog> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| WimmError::Import(format!("Failed to read KNAB statement: {}", e)))?;

        // title line
        let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");

        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let columns = Columns::locate(csv_reader.headers()?)?;

        let mut log = TransactionLog::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or_default().trim();

            if field(columns.date).is_empty() {
                tracing::warn!("KNAB row {}: no transaction date; skipped", row + 1);
                continue;
            }

            let date = parse_statement_date(field(columns.date))?;
            let amount = Money::parse(field(columns.amount)).map_err(|e| {
                WimmError::Import(format!("KNAB row {}: {}", row + 1, e))
            })?;

            let (from, to) = if field(columns.direction) == "C" {
                (external_account(field(columns.counterparty))?, account.clone())
            } else {
                (account.clone(), AccountName::uncategorized())
            };

            log.push(Transaction::transfer(
                date,
                field(columns.description),
                from,
                to,
                amount,
            )?);
        }

        Ok(log)
    }
}
