//! Bank statement importers
//!
//! Each supported bank exports statements in its own CSV dialect. An
//! importer turns one statement into transactions against a bank account in
//! the ledger; the counterparty side goes to an `Ext.<name>` account.

pub mod asn;
pub mod knab;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{WimmError, WimmResult};
use crate::models::{AccountName, TransactionLog};

pub use asn::AsnImporter;
pub use knab::KnabImporter;

/// Root of counterparty accounts
pub const EXTERNAL_ROOT: &str = "Ext";

/// Counterparty used when a statement row carries no name
pub const UNKNOWN_COUNTERPARTY: &str = "unknown";

/// Reader for one bank's statement format
pub trait StatementImporter {
    /// Bank code as given on the command line
    fn bank(&self) -> &'static str;

    /// Ledger account the statement belongs to when none is given
    fn default_account(&self) -> &'static str;

    /// Parse a statement into transactions booked against `account`
    fn parse(&self, reader: &mut dyn Read, account: &AccountName) -> WimmResult<TransactionLog>;

    /// Parse a statement file
    fn import_file(&self, path: &Path, account: &AccountName) -> WimmResult<TransactionLog> {
        let mut file = File::open(path).map_err(|e| {
            WimmError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.parse(&mut file, account)
    }
}

/// Banks with a statement importer
pub const SUPPORTED_BANKS: &[&str] = &["ASN", "KNAB"];

/// Importer for a bank code (case-insensitive)
pub fn importer_for(bank: &str) -> Option<Box<dyn StatementImporter>> {
    match bank.to_uppercase().as_str() {
        "ASN" => Some(Box::new(AsnImporter)),
        "KNAB" => Some(Box::new(KnabImporter)),
        _ => None,
    }
}

/// Make a counterparty name usable as an account segment
///
/// Spaces become `_`, dots are removed and the result is trimmed.
pub fn clean_name(name: &str) -> String {
    name.trim().replace(' ', "_").replace('.', "")
}

/// Counterparty account `Ext.<clean name>`, `Ext.unknown` for blank names
pub fn external_account(name: &str) -> WimmResult<AccountName> {
    let cleaned = clean_name(name);
    let segment = if cleaned.is_empty() {
        UNKNOWN_COUNTERPARTY
    } else {
        cleaned.as_str()
    };
    AccountName::parse(&format!("{}.{}", EXTERNAL_ROOT, segment))
}

/// Parse a statement date in one of the formats banks use
pub(crate) fn parse_statement_date(raw: &str) -> WimmResult<NaiveDate> {
    let raw = raw.trim();
    ["%d-%m-%Y", "%Y-%m-%d", "%d/%m/%Y", "%Y%m%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| WimmError::Import(format!("Could not parse date: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("J. de Vries"), "J_de_Vries");
        assert_eq!(clean_name("  Bol.com BV "), "Bolcom_BV");
        assert_eq!(clean_name("plain"), "plain");
    }

    #[test]
    fn test_external_account() {
        assert_eq!(external_account("Bob Smith").unwrap().to_string(), "Ext.Bob_Smith");
        assert_eq!(external_account("  ").unwrap().to_string(), "Ext.unknown");
    }

    #[test]
    fn test_importer_for() {
        assert_eq!(importer_for("asn").unwrap().bank(), "ASN");
        assert_eq!(importer_for("KNAB").unwrap().default_account(), "Assets.Bank.KNAB");
        assert!(importer_for("ING").is_none());
    }

    #[test]
    fn test_parse_statement_date() {
        let expected = NaiveDate::from_ymd_opt(2021, 4, 22).unwrap();
        assert_eq!(parse_statement_date("22-04-2021").unwrap(), expected);
        assert_eq!(parse_statement_date("2021-04-22").unwrap(), expected);
        assert!(parse_statement_date("April 22").is_err());
    }
}
