//! CLI commands for showing ledger data
//!
//! Balances, transactions and invoices.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_balance_json, format_balance_report, format_invoice_list, format_transactions_yaml};
use crate::error::{WimmError, WimmResult};
use crate::models::InvoiceField;
use crate::reports::{BalanceOptions, BalanceReport};
use crate::services::InvoiceService;
use crate::storage::Storage;

/// Show subcommands
#[derive(Subcommand, Debug)]
pub enum ShowCommands {
    /// Show account balances
    Balance {
        /// Roll accounts up to this many name segments
        #[arg(short, long, default_value = "3")]
        depth: usize,

        /// Hide accounts with a zero balance
        #[arg(long)]
        nozeros: bool,

        /// Include outstanding invoice amounts and tax totals
        #[arg(long)]
        with_invoices: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show transactions as YAML
    #[command(alias = "txn")]
    Transactions {
        /// First date to include (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// First date to exclude (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Show invoices, one per line
    Invoices {
        /// Invoice id, or a prefix ending in `*` (e.g. "INS*")
        pattern: Option<String>,

        /// Field to sort by (id, date, due_date, amount, tax, from, to, ext_name)
        #[arg(long)]
        sort_by: Option<String>,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,
    },
}

/// Handle show commands
pub fn handle_show_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ShowCommands,
) -> WimmResult<()> {
    match cmd {
        ShowCommands::Balance {
            depth,
            nozeros,
            with_invoices,
            json,
        } => {
            let options = BalanceOptions {
                depth: Some(depth),
                hide_zeros: nozeros,
                with_invoices,
            };
            let report = BalanceReport::generate(storage, options)?;

            if json {
                println!("{}", format_balance_json(&report)?);
            } else {
                print!("{}", format_balance_report(&report));
            }
        }

        ShowCommands::Transactions { start, end } => {
            let mut log = storage.transactions.get_all()?;
            if start.is_some() || end.is_some() {
                let start = parse_date_arg("start", start.as_deref())?.unwrap_or(NaiveDate::MIN);
                let end = parse_date_arg("end", end.as_deref())?.unwrap_or(NaiveDate::MAX);
                log = log.between(start, end);
            }
            print!("{}", format_transactions_yaml(&log)?);
        }

        ShowCommands::Invoices {
            pattern,
            sort_by,
            reverse,
        } => {
            let field = sort_by
                .as_deref()
                .map(str::parse::<InvoiceField>)
                .transpose()?;
            let service = InvoiceService::new(storage, settings);
            let invoices = service.list(pattern.as_deref(), field, reverse)?;
            print!("{}", format_invoice_list(&invoices));
        }
    }

    Ok(())
}

/// Parse an optional `YYYY-MM-DD` command line date
pub(crate) fn parse_date_arg(name: &str, value: Option<&str>) -> WimmResult<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                WimmError::Validation(format!(
                    "Invalid {} date format: {}. Use YYYY-MM-DD",
                    name, s
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(parse_date_arg("start", None).unwrap(), None);
        assert_eq!(
            parse_date_arg("start", Some("2021-02-03")).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 3)
        );
        let err = parse_date_arg("end", Some("03-02-2021")).unwrap_err();
        assert!(err.to_string().contains("Invalid end date"));
    }
}
