//! CLI commands for adding ledger items

use std::path::PathBuf;

use clap::Subcommand;

use super::show::parse_date_arg;
use crate::config::Settings;
use crate::display::format_invoice_details;
use crate::error::{WimmError, WimmResult};
use crate::models::{AccountName, Money};
use crate::services::{InvoiceService, NewInvoice};
use crate::storage::Storage;

/// Add subcommands
#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Add an invoice and book its transaction
    Invoice {
        /// Invoice prefix, 3 characters (INR, INS, ...)
        prefix: String,

        /// Invoice amount (e.g. "1000.00")
        #[arg(short, long)]
        amount: String,

        /// Name of the other company
        #[arg(short = 'n', long)]
        ext_name: String,

        /// Invoice id (defaults to the next free id)
        #[arg(long)]
        id: Option<String>,

        /// Tax amount (defaults to tax_rate * amount)
        #[arg(short, long)]
        tax: Option<String>,

        /// Account the amount comes from
        #[arg(long)]
        from: Option<String>,

        /// Account the amount goes to
        #[arg(long)]
        to: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Invoice date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Due date (YYYY-MM-DD, defaults to date + payment term)
        #[arg(long)]
        due_date: Option<String>,

        /// Document to file with the invoice
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Handle add commands
pub fn handle_add_command(storage: &Storage, settings: &Settings, cmd: AddCommands) -> WimmResult<()> {
    match cmd {
        AddCommands::Invoice {
            prefix,
            amount,
            ext_name,
            id,
            tax,
            from,
            to,
            description,
            date,
            due_date,
            file,
        } => {
            let request = NewInvoice {
                amount: parse_amount("amount", &amount)?,
                ext_name,
                id,
                tax: tax.as_deref().map(|t| parse_amount("tax", t)).transpose()?,
                from: from.as_deref().map(AccountName::parse).transpose()?,
                to: to.as_deref().map(AccountName::parse).transpose()?,
                description,
                date: parse_date_arg("invoice", date.as_deref())?,
                due_date: parse_date_arg("due", due_date.as_deref())?,
                attachment: file,
            };

            let service = InvoiceService::new(storage, settings);
            let invoice = service.add(&prefix.to_uppercase(), &request)?;

            println!("Added invoice:");
            print!("{}", format_invoice_details(&invoice));
        }
    }

    Ok(())
}

fn parse_amount(name: &str, value: &str) -> WimmResult<Money> {
    Money::parse(value).map_err(|e| {
        WimmError::Validation(format!(
            "Invalid {} format: '{}'. Use format like '1000.00' or '1000'. Error: {}",
            name, value, e
        ))
    })
}
