//! User settings for wimm
//!
//! Company name, tax rate and the account templates used when invoices are
//! booked. Settings are read from `settings.yaml` in the data directory;
//! every key is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::paths::WimmPaths;
use crate::error::WimmError;
use crate::models::{AccountName, Money};
use crate::storage::file_io::{read_yaml_required, write_yaml_atomic};

/// Prefix of invoices received from suppliers
pub const PREFIX_RECEIVED: &str = "INR";

/// Prefix of invoices sent to clients
pub const PREFIX_SENT: &str = "INS";

/// Values substituted into account templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams<'a> {
    pub company_name: &'a str,
    pub invoice_id: &'a str,
    pub ext_name: &'a str,
}

/// A pair of account name templates for one invoice prefix
///
/// Templates may use the `{company_name}`, `{invoice_id}` and `{ext_name}`
/// placeholders, e.g. `"{company_name}.INR.{invoice_id}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTemplate {
    pub from: String,
    pub to: String,
}

impl AccountTemplate {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Render both templates into account names
    ///
    /// # Errors
    ///
    /// Returns a validation error if a rendered name is not a valid account
    /// (for example an empty `ext_name` leaving an empty segment).
    pub fn render(&self, params: &TemplateParams<'_>) -> Result<(AccountName, AccountName), WimmError> {
        Ok((
            AccountName::parse(&fill(&self.from, params))?,
            AccountName::parse(&fill(&self.to, params))?,
        ))
    }
}

fn fill(template: &str, params: &TemplateParams<'_>) -> String {
    template
        .replace("{company_name}", params.company_name)
        .replace("{invoice_id}", params.invoice_id)
        .replace("{ext_name}", params.ext_name)
}

/// User settings for wimm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Own company name, used as the root of company accounts
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Tax rate applied to new invoices (0.21 = 21%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Days between invoice date and due date for new invoices
    #[serde(default = "default_payment_term_days")]
    pub payment_term_days: i64,

    /// Attachment folder per invoice prefix, relative to the data directory
    #[serde(default = "default_invoice_folders")]
    pub invoice_folders: BTreeMap<String, String>,

    /// Principal transfer templates per invoice prefix
    #[serde(default = "default_invoice_accounts")]
    pub invoice_accounts: BTreeMap<String, AccountTemplate>,

    /// Tax transfer templates per invoice prefix
    #[serde(default = "default_tax_accounts")]
    pub tax_accounts: BTreeMap<String, AccountTemplate>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_company_name() -> String {
    "MyCompany".to_string()
}

fn default_tax_rate() -> f64 {
    0.21
}

fn default_payment_term_days() -> i64 {
    30
}

fn default_invoice_folders() -> BTreeMap<String, String> {
    BTreeMap::from([
        (PREFIX_RECEIVED.to_string(), "invoices_received".to_string()),
        (PREFIX_SENT.to_string(), "invoices_sent".to_string()),
    ])
}

fn default_invoice_accounts() -> BTreeMap<String, AccountTemplate> {
    BTreeMap::from([
        (
            PREFIX_RECEIVED.to_string(),
            AccountTemplate::new("Ext.Suppliers.{ext_name}", "{company_name}.INR.{invoice_id}"),
        ),
        (
            PREFIX_SENT.to_string(),
            AccountTemplate::new("{company_name}.INS.{invoice_id}", "Ext.Clients.{ext_name}"),
        ),
    ])
}

fn default_tax_accounts() -> BTreeMap<String, AccountTemplate> {
    BTreeMap::from([
        (
            PREFIX_RECEIVED.to_string(),
            AccountTemplate::new("Ext.Tax", "{company_name}.Tax.to_receive"),
        ),
        (
            PREFIX_SENT.to_string(),
            AccountTemplate::new("{company_name}.Tax.to_pay", "Ext.Tax"),
        ),
    ])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            company_name: default_company_name(),
            tax_rate: default_tax_rate(),
            payment_term_days: default_payment_term_days(),
            invoice_folders: default_invoice_folders(),
            invoice_accounts: default_invoice_accounts(),
            tax_accounts: default_tax_accounts(),
        }
    }
}

impl Settings {
    /// Principal accounts for an invoice prefix
    ///
    /// An unknown prefix resolves to `Uncategorized` on both sides.
    pub fn invoice_accounts_for(
        &self,
        prefix: &str,
        params: &TemplateParams<'_>,
    ) -> Result<(AccountName, AccountName), WimmError> {
        resolve(&self.invoice_accounts, prefix, params)
    }

    /// Tax accounts for an invoice prefix, `Uncategorized` when unknown
    pub fn tax_accounts_for(
        &self,
        prefix: &str,
        params: &TemplateParams<'_>,
    ) -> Result<(AccountName, AccountName), WimmError> {
        resolve(&self.tax_accounts, prefix, params)
    }

    /// Default tax for an invoice amount
    pub fn tax_for(&self, amount: Money) -> Money {
        amount.scale(self.tax_rate)
    }

    /// Attachment folder for an invoice prefix
    pub fn folder_for(&self, prefix: &str) -> Option<&str> {
        self.invoice_folders.get(prefix).map(String::as_str)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WimmPaths) -> Result<Self, WimmError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            read_yaml_required(&settings_path).map_err(|e| {
                WimmError::Config(format!("Failed to load settings file: {}", e))
            })
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WimmPaths) -> Result<(), WimmError> {
        paths.ensure_directories()?;
        write_yaml_atomic(paths.settings_file(), self)
    }
}

fn resolve(
    templates: &BTreeMap<String, AccountTemplate>,
    prefix: &str,
    params: &TemplateParams<'_>,
) -> Result<(AccountName, AccountName), WimmError> {
    match templates.get(prefix) {
        Some(template) => template.render(params),
        None => Ok((AccountName::uncategorized(), AccountName::uncategorized())),
    }
}
