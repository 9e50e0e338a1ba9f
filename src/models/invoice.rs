//! Invoice model
//!
//! An invoice is a billable document with a structured identifier such as
//! `INR20_001`: a three-letter prefix (`INR` received, `INS` sent), the
//! two-digit year and a zero-padded sequence number. Booking an invoice
//! produces one settlement transaction, including tax when there is any.
//!
//! Sign convention: a positive `amount` moves money from the `from` account
//! into the `to` account, i.e. `to` holds the receivable.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::account_name::AccountName;
use super::money::Money;
use super::transaction::Transaction;
use crate::config::settings::{Settings, TemplateParams};
use crate::error::{WimmError, WimmResult};

/// Canonical invoice identifier: prefix, year, `_`, 3 or 4 digit sequence
pub const ID_PATTERN: &str = r"^[A-Z]{3}[0-9]{2}_[0-9]{3,4}$";

/// Counterparty name used when none was given
pub const DEFAULT_EXT_NAME: &str = "ext_company_name";

const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const LEGACY_ID_PATTERN: &str = r"^([A-Z]{3}[0-9]{2})\.([0-9]{3,4})$";

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ID_PATTERN).expect("invoice id pattern is valid"))
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

fn legacy_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LEGACY_ID_PATTERN).expect("legacy id pattern is valid"))
}

/// Check an invoice identifier against the canonical pattern
pub fn validate_id(id: &str) -> WimmResult<()> {
    if id_regex().is_match(id) {
        Ok(())
    } else {
        Err(WimmError::Validation(format!(
            "Invoice field 'id': '{}' does not match {}",
            id, ID_PATTERN
        )))
    }
}

/// Parse a `YYYY-MM-DD` date, naming the field in the error
pub fn parse_date(field: &str, raw: &str) -> WimmResult<NaiveDate> {
    let invalid = || {
        WimmError::Validation(format!(
            "Invoice field '{}': '{}' is not a YYYY-MM-DD date",
            field, raw
        ))
    };

    if !date_regex().is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// Upconvert an identifier written with the old dot separator
///
/// `INR20.001` becomes `INR20_001`; anything else is returned unchanged.
pub fn normalize_legacy_id(id: &str) -> String {
    legacy_id_regex().replace(id, "${1}_${2}").into_owned()
}

/// A single invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InvoiceDocument")]
pub struct Invoice {
    pub id: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "Money::is_zero")]
    pub tax: Money,
    pub date: NaiveDate,
    pub from: AccountName,
    pub to: AccountName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attachment path relative to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Counterparty name, substituted into account templates
    pub ext_name: String,
}

impl Invoice {
    /// Create a new invoice with `Uncategorized` accounts and no tax
    ///
    /// # Errors
    ///
    /// Returns a validation error if `id` is not a canonical identifier.
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: Money) -> WimmResult<Self> {
        let invoice = Self {
            id: id.into(),
            amount,
            tax: Money::zero(),
            date,
            from: AccountName::uncategorized(),
            to: AccountName::uncategorized(),
            description: None,
            attachment: None,
            due_date: None,
            ext_name: DEFAULT_EXT_NAME.to_string(),
        };
        invoice.validate()?;
        Ok(invoice)
    }

    /// The three-letter prefix of the id (`INR`, `INS`, ...)
    pub fn prefix(&self) -> &str {
        self.id.get(..3).unwrap_or(&self.id)
    }

    /// Check the identifier after a caller-level edit
    pub fn validate(&self) -> WimmResult<()> {
        validate_id(&self.id)?;
        if let Some(due) = self.due_date {
            if due < self.date {
                return Err(WimmError::Validation(format!(
                    "Invoice field 'due_date': {} is before invoice date {}",
                    due, self.date
                )));
            }
        }
        Ok(())
    }

    fn template_params<'a>(&'a self, settings: &'a Settings) -> TemplateParams<'a> {
        TemplateParams {
            company_name: &settings.company_name,
            invoice_id: &self.id,
            ext_name: &self.ext_name,
        }
    }

    /// Set `from`/`to` from the invoice account templates of the prefix
    ///
    /// An unknown prefix sets both sides to `Uncategorized`.
    pub fn set_accounts(&mut self, settings: &Settings) -> WimmResult<()> {
        let (from, to) =
            settings.invoice_accounts_for(self.prefix(), &self.template_params(settings))?;
        self.from = from;
        self.to = to;
        Ok(())
    }

    /// The settlement transaction of this invoice
    ///
    /// The principal transfer `from -> to` of `amount` is combined with the
    /// tax transfer from the tax templates when `tax` is non-zero. Both land
    /// in one transfer set; an account appearing in both takes the tax
    /// value.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the templates produce invalid account
    /// names or the combined transfers do not balance.
    pub fn transaction(&self, settings: &Settings) -> WimmResult<Transaction> {
        let principal = Transaction::transfer(
            self.date,
            format!("Invoice {}", self.id),
            self.from.clone(),
            self.to.clone(),
            self.amount,
        )?;

        if self.tax.is_zero() {
            return Ok(principal);
        }

        let (tax_from, tax_to) =
            settings.tax_accounts_for(self.prefix(), &self.template_params(settings))?;
        let tax = Transaction::transfer(
            self.date,
            format!("Tax for invoice {}", self.id),
            tax_from,
            tax_to,
            self.tax,
        )?;

        let transfers = principal.transfers.merged(&tax.transfers)?;
        Ok(Transaction::with_transfers(
            self.date,
            principal.description,
            transfers,
        ))
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} amount:{:<10}  {} -->  {}",
            self.id, self.amount, self.from, self.to
        )
    }
}

/// Invoice fields usable as a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceField {
    Id,
    Date,
    DueDate,
    Amount,
    Tax,
    From,
    To,
    Description,
    ExtName,
}

impl InvoiceField {
    /// Compare two invoices on this field
    pub fn compare(&self, a: &Invoice, b: &Invoice) -> std::cmp::Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Date => a.date.cmp(&b.date),
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Tax => a.tax.cmp(&b.tax),
            Self::From => a.from.cmp(&b.from),
            Self::To => a.to.cmp(&b.to),
            Self::Description => a.description.cmp(&b.description),
            Self::ExtName => a.ext_name.cmp(&b.ext_name),
        }
    }
}

impl FromStr for InvoiceField {
    type Err = WimmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "date" => Ok(Self::Date),
            "due_date" | "due" => Ok(Self::DueDate),
            "amount" => Ok(Self::Amount),
            "tax" => Ok(Self::Tax),
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            "description" => Ok(Self::Description),
            "ext_name" => Ok(Self::ExtName),
            other => Err(WimmError::Validation(format!(
                "Unknown invoice field: '{}'",
                other
            ))),
        }
    }
}

/// Invoice as found on disk; absent fields take their defaults
#[derive(Debug, Clone, Deserialize)]
struct InvoiceDocument {
    id: String,
    #[serde(default)]
    amount: Money,
    #[serde(default)]
    tax: Option<Money>,
    date: String,
    #[serde(default)]
    from: Option<AccountName>,
    #[serde(default)]
    to: Option<AccountName>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    attachment: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    ext_name: Option<String>,
}

impl TryFrom<InvoiceDocument> for Invoice {
    type Error = WimmError;

    fn try_from(doc: InvoiceDocument) -> Result<Self, Self::Error> {
        let invoice = Self {
            id: normalize_legacy_id(&doc.id),
            amount: doc.amount,
            tax: doc.tax.unwrap_or_default(),
            date: parse_date("date", &doc.date)?,
            from: doc.from.unwrap_or_else(AccountName::uncategorized),
            to: doc.to.unwrap_or_else(AccountName::uncategorized),
            description: doc.description,
            attachment: doc.attachment,
            due_date: doc
                .due_date
                .as_deref()
                .map(|raw| parse_date("due_date", raw))
                .transpose()?,
            ext_name: doc.ext_name.unwrap_or_else(|| DEFAULT_EXT_NAME.to_string()),
        };
        invoice.validate()?;
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AccountTemplate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn acct(s: &str) -> AccountName {
        AccountName::parse(s).unwrap()
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.company_name = "Acme".into();
        settings
    }

    #[test]
    fn test_validate_canonical_ids() {
        assert!(validate_id("INR20_0001").is_ok());
        assert!(validate_id("INR21_003").is_ok());
        assert!(validate_id("INS99_999").is_ok());
    }

    #[test]
    fn test_validate_rejects_deviations() {
        let err = validate_id("INR20-0001").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'id'"));

        assert!(validate_id("INR20_01").is_err());
        assert!(validate_id("INR20_00001").is_err());
        assert!(validate_id("inr20_001").is_err());
        assert!(validate_id("INR2020_001").is_err());
    }

    #[test]
    fn test_new_validates_id() {
        assert!(Invoice::new("INR20_0001", date(2020, 1, 1), Money::from_units(70)).is_ok());
        assert!(Invoice::new("INR20-0001", date(2020, 1, 1), Money::from_units(70)).is_err());
    }

    #[test]
    fn test_validate_after_edit() {
        let mut invoice = Invoice::new("INS20_001", date(2020, 1, 1), Money::from_units(70)).unwrap();
        invoice.id = "INS20.001x".into();
        assert!(invoice.validate().is_err());

        invoice.id = "INS20_001".into();
        invoice.due_date = Some(date(2019, 12, 31));
        let err = invoice.validate().unwrap_err();
        assert!(err.to_string().contains("'due_date'"));
    }

    #[test]
    fn test_parse_date_names_field() {
        assert_eq!(parse_date("date", "2020-02-10").unwrap(), date(2020, 2, 10));
        let err = parse_date("due_date", "10-02-2020").unwrap_err();
        assert!(err.to_string().contains("'due_date'"));
        assert!(parse_date("date", "2020-02-30").is_err());
    }

    #[test]
    fn test_normalize_legacy_id() {
        assert_eq!(normalize_legacy_id("INR20.001"), "INR20_001");
        assert_eq!(normalize_legacy_id("INS21.0042"), "INS21_0042");
        assert_eq!(normalize_legacy_id("INR20_001"), "INR20_001");
        assert_eq!(normalize_legacy_id("INR20-001"), "INR20-001");
    }

    #[test]
    fn test_prefix() {
        let invoice = Invoice::new("INS21_010", date(2021, 3, 1), Money::zero()).unwrap();
        assert_eq!(invoice.prefix(), "INS");
    }

    #[test]
    fn test_set_accounts_from_template() {
        let mut settings = settings();
        settings.invoice_accounts.insert(
            "INR".into(),
            AccountTemplate::new("Ext.{ext_name}", "{company_name}.INR.{invoice_id}"),
        );

        let mut invoice = Invoice::new("INR20_001", date(2020, 1, 1), Money::from_units(70)).unwrap();
        invoice.ext_name = "Bob".into();
        invoice.set_accounts(&settings).unwrap();

        assert_eq!(invoice.from, acct("Ext.Bob"));
        assert_eq!(invoice.to, acct("Acme.INR.INR20_001"));
    }

    #[test]
    fn test_set_accounts_unknown_prefix() {
        let mut invoice = Invoice::new("ABC20_001", date(2020, 1, 1), Money::from_units(70)).unwrap();
        invoice.from = acct("Somewhere");
        invoice.set_accounts(&settings()).unwrap();

        assert_eq!(invoice.from, AccountName::uncategorized());
        assert_eq!(invoice.to, AccountName::uncategorized());
    }

    #[test]
    fn test_transaction_for_unknown_prefix() {
        let mut invoice = Invoice::new("ABC20_001", date(2020, 1, 1), Money::from_units(100)).unwrap();
        invoice.tax = Money::from_units(21);
        invoice.set_accounts(&settings()).unwrap();

        let txn = invoice.transaction(&settings()).unwrap();
        assert_eq!(txn.transfers.len(), 1);
        assert_eq!(txn.transfers.get(&AccountName::uncategorized()), Some(Money::zero()));
    }

    #[test]
    fn test_transaction_without_tax() {
        let mut invoice = Invoice::new("INS20_001", date(2020, 2, 1), Money::from_units(50)).unwrap();
        invoice.ext_name = "Alice".into();
        invoice.set_accounts(&settings()).unwrap();

        let txn = invoice.transaction(&settings()).unwrap();
        assert_eq!(txn.description, "Invoice INS20_001");
        assert_eq!(txn.transfers.len(), 2);
        assert_eq!(txn.transfers.get(&acct("Acme.INS.INS20_001")), Some(Money::from_units(-50)));
        assert_eq!(txn.transfers.get(&acct("Ext.Clients.Alice")), Some(Money::from_units(50)));
    }

    #[test]
    fn test_transaction_with_tax_merges_legs() {
        let mut invoice = Invoice::new("INR20_002", date(2020, 2, 10), Money::from_units(100)).unwrap();
        invoice.ext_name = "Bob".into();
        invoice.tax = Money::from_units(21);
        invoice.set_accounts(&settings()).unwrap();

        let txn = invoice.transaction(&settings()).unwrap();
        assert_eq!(txn.transfers.len(), 4);
        assert!(txn.transfers.sum().is_zero());
        assert_eq!(txn.transfers.get(&acct("Ext.Tax")), Some(Money::from_units(-21)));
        assert_eq!(txn.transfers.get(&acct("Acme.Tax.to_receive")), Some(Money::from_units(21)));
        assert_eq!(txn.date, date(2020, 2, 10));
    }

    #[test]
    fn test_transaction_with_colliding_tax_account_fails() {
        let mut settings = settings();
        settings
            .tax_accounts
            .insert("INR".into(), AccountTemplate::new("Ext.Tax", "{company_name}.INR.{invoice_id}"));

        let mut invoice = Invoice::new("INR20_003", date(2020, 3, 1), Money::from_units(100)).unwrap();
        invoice.ext_name = "Bob".into();
        invoice.tax = Money::from_units(21);
        invoice.set_accounts(&settings).unwrap();

        assert!(invoice.transaction(&settings).unwrap_err().is_validation());
    }

    #[test]
    fn test_load_with_defaults_and_legacy_id() {
        let yaml = "id: INR20.004\ndate: 2020-12-05\namount: 1000\n";
        let invoice: Invoice = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(invoice.id, "INR20_004");
        assert_eq!(invoice.from, AccountName::uncategorized());
        assert_eq!(invoice.ext_name, DEFAULT_EXT_NAME);
        assert!(invoice.tax.is_zero());
    }

    #[test]
    fn test_load_rejects_bad_date() {
        let yaml = "id: INR20_004\ndate: 05-12-2020\n";
        let err = serde_yaml::from_str::<Invoice>(yaml).unwrap_err();
        assert!(err.to_string().contains("'date'"));
    }

    #[test]
    fn test_save_omits_empty_fields() {
        let invoice = Invoice::new("INR20_005", date(2020, 1, 1), Money::from_units(70)).unwrap();
        let yaml = serde_yaml::to_string(&invoice).unwrap();
        assert!(!yaml.contains("attachment"));
        assert!(!yaml.contains("due_date"));
        assert!(!yaml.contains("tax"));

        let back: Invoice = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, invoice);
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("id".parse::<InvoiceField>().unwrap(), InvoiceField::Id);
        assert_eq!("due_date".parse::<InvoiceField>().unwrap(), InvoiceField::DueDate);
        assert!("colour".parse::<InvoiceField>().is_err());
    }

    #[test]
    fn test_display() {
        let invoice = Invoice::new("INR20_001", date(2020, 1, 1), Money::from_units(70)).unwrap();
        assert_eq!(
            invoice.to_string(),
            "INR20_001 amount:70.00       Uncategorized -->  Uncategorized"
        );
    }
}
