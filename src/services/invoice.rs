//! Invoice service
//!
//! Books new invoices: fills in defaults from the settings and the existing
//! invoice log, files the attachment and appends both the invoice and its
//! settlement transaction.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};

use crate::config::Settings;
use crate::error::{WimmError, WimmResult};
use crate::models::{AccountName, Invoice, InvoiceField, InvoiceLog, Money};
use crate::storage::Storage;

/// Values for a new invoice; unset fields are derived
#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
    pub amount: Money,
    pub ext_name: String,
    /// Defaults to the next free id for the prefix
    pub id: Option<String>,
    /// Defaults to `tax_rate * amount`
    pub tax: Option<Money>,
    /// Default from the account templates of the prefix
    pub from: Option<AccountName>,
    pub to: Option<AccountName>,
    pub description: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to the invoice date plus the payment term
    pub due_date: Option<NaiveDate>,
    /// Document to file in the invoice folder of the prefix
    pub attachment: Option<PathBuf>,
}

/// Service for invoice management
pub struct InvoiceService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> InvoiceService<'a> {
    /// Create a new invoice service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Build an invoice with all defaults applied, without saving it
    pub fn prepare(&self, prefix: &str, request: &NewInvoice) -> WimmResult<Invoice> {
        let invoices = self.storage.invoices.get_all()?;

        let id = match &request.id {
            Some(id) => id.clone(),
            None => invoices.get_next_id(prefix)?,
        };
        let date = request.date.unwrap_or_else(|| Local::now().date_naive());

        let mut invoice = Invoice::new(id, date, request.amount)?;
        invoice.ext_name = request.ext_name.trim().to_string();
        invoice.tax = request
            .tax
            .unwrap_or_else(|| self.settings.tax_for(request.amount));
        invoice.set_accounts(self.settings)?;

        if let Some(from) = &request.from {
            invoice.from = from.clone();
        }
        if let Some(to) = &request.to {
            invoice.to = to.clone();
        }
        invoice.description = request.description.clone();
        invoice.due_date = Some(match request.due_date {
            Some(due) => due,
            None => self.default_due_date(date)?,
        });

        invoice.validate()?;
        Ok(invoice)
    }

    /// Add a new invoice
    ///
    /// Appends the invoice to the invoice log and its settlement transaction
    /// to the transaction log. Nothing is written if the invoice or its
    /// transaction is invalid.
    pub fn add(&self, prefix: &str, request: &NewInvoice) -> WimmResult<Invoice> {
        if let Some(source) = &request.attachment {
            if !source.is_file() {
                return Err(WimmError::Validation(format!(
                    "File not found: {}",
                    source.display()
                )));
            }
        }

        let mut invoice = self.prepare(prefix, request)?;
        let transaction = invoice.transaction(self.settings)?;

        let copied = match &request.attachment {
            Some(source) => {
                let (relative, target) =
                    self.file_attachment(invoice.prefix(), &invoice.id, source)?;
                invoice.attachment = Some(relative);
                Some(target)
            }
            None => None,
        };

        let comment = format!("invoice {} added {}", invoice.id, Local::now().format("%Y-%m-%d"));
        if let Err(e) = self.storage.invoices.append(invoice.clone(), &comment) {
            if let Some(target) = &copied {
                if let Err(remove_err) = std::fs::remove_file(target) {
                    tracing::warn!("Failed to remove {}: {}", target.display(), remove_err);
                }
            }
            return Err(e);
        }
        self.storage.transactions.append(vec![transaction], &comment)?;

        tracing::info!("Added invoice {} ({})", invoice.id, invoice.amount);
        Ok(invoice)
    }

    /// Invoice date plus the configured payment term
    fn default_due_date(&self, date: NaiveDate) -> WimmResult<NaiveDate> {
        let days = self.settings.payment_term_days;
        Duration::try_days(days)
            .and_then(|term| date.checked_add_signed(term))
            .ok_or_else(|| {
                WimmError::Config(format!("payment_term_days out of range: {}", days))
            })
    }

    /// Copy an attachment into the invoice folder of the prefix
    ///
    /// The copy is named `<id>_<file name>` with spaces replaced by `_`.
    /// Returns its path relative to the data directory and the full path.
    fn file_attachment(
        &self,
        prefix: &str,
        id: &str,
        source: &Path,
    ) -> WimmResult<(String, PathBuf)> {
        let folder = self.settings.folder_for(prefix).ok_or_else(|| {
            WimmError::Config(format!("No invoice folder configured for prefix {}", prefix))
        })?;

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                WimmError::Validation(format!("Invalid file name: {}", source.display()))
            })?;
        let target_name = format!("{}_{}", id, file_name.replace(' ', "_"));

        let target_dir = self.storage.paths().folder(folder);
        std::fs::create_dir_all(&target_dir)?;
        let target = target_dir.join(&target_name);
        if target.exists() {
            return Err(WimmError::Validation(format!(
                "Attachment already exists: {}",
                target.display()
            )));
        }

        std::fs::copy(source, &target)?;
        tracing::info!("Copied {} to {}", source.display(), target.display());

        Ok((format!("{}/{}", folder, target_name), target))
    }

    /// List invoices, optionally filtered by id pattern and sorted by a field
    pub fn list(
        &self,
        pattern: Option<&str>,
        sort_by: Option<InvoiceField>,
        reverse: bool,
    ) -> WimmResult<Vec<Invoice>> {
        let all = self.storage.invoices.get_all()?;

        let selected: InvoiceLog = match pattern {
            Some(pattern) => all.get_by_id(pattern)?.into_iter().cloned().collect(),
            None => all,
        };

        let field = sort_by.unwrap_or(InvoiceField::Id);
        Ok(selected
            .get_sorted_by(field, reverse)
            .into_iter()
            .cloned()
            .collect())
    }
}
