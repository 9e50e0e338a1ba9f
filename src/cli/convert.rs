//! CLI commands for converting ledger files

use clap::Subcommand;

use crate::error::WimmResult;
use crate::storage::Storage;

/// Convert subcommands
#[derive(Subcommand, Debug)]
pub enum ConvertCommands {
    /// Rewrite the transaction file in the transfer format
    ///
    /// Records in the old from/to/amount shape become transfer sets. The
    /// file is overwritten; comments in it are lost.
    Transactions {
        /// Confirm overwriting the transaction file
        #[arg(long)]
        yes: bool,
    },
}

/// Handle convert commands
pub fn handle_convert_command(storage: &Storage, cmd: ConvertCommands) -> WimmResult<()> {
    match cmd {
        ConvertCommands::Transactions { yes } => {
            if !yes {
                println!("The transaction file will be overwritten. Run again with --yes to confirm.");
                return Ok(());
            }

            storage.transactions.save()?;
            tracing::info!("Rewrote {}", storage.paths().transactions_file().display());
            println!(
                "Converted {} transactions in {}",
                storage.transactions.count()?,
                storage.paths().transactions_file().display()
            );
        }
    }

    Ok(())
}
