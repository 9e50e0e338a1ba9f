//! CLI command handler for bank statement import
//!
//! Appends the transactions of a bank statement to the transaction log.

use std::path::PathBuf;

use clap::Subcommand;

use crate::display::format_transaction_lines;
use crate::error::WimmResult;
use crate::models::AccountName;
use crate::services::ImportService;
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Import a bank statement to the end of the transaction log
    Statement {
        /// Bank code (ASN, KNAB)
        bank: String,

        /// Statement file
        file: PathBuf,

        /// Ledger account of the bank (defaults per bank, e.g. Assets.Bank.ASN)
        #[arg(short, long)]
        account: Option<String>,

        /// Only print what would be imported
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle import commands
pub fn handle_import_command(storage: &Storage, cmd: ImportCommands) -> WimmResult<()> {
    match cmd {
        ImportCommands::Statement {
            bank,
            file,
            account,
            dry_run,
        } => {
            let account = account.as_deref().map(AccountName::parse).transpose()?;
            let service = ImportService::new(storage);

            println!("Importing {}", file.display());

            if dry_run {
                let (account, transactions) = service.preview(&bank, &file, account)?;
                println!("{} transactions for {} (not saved):", transactions.len(), account);
                print!("{}", format_transaction_lines(&transactions));
                return Ok(());
            }

            let result = service.import_statement(&bank, &file, account)?;
            println!("Imported {} transactions into {}", result.imported, result.account);
        }
    }

    Ok(())
}
