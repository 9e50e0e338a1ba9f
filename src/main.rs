use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wimm::cli::{
    handle_add_command, handle_convert_command, handle_import_command, handle_show_command,
};
use wimm::config::{paths::WimmPaths, settings::Settings};
use wimm::storage::file_io::to_yaml_string;
use wimm::storage::{initialize_storage, Storage};

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "WIMM_LOG";

#[derive(Parser)]
#[command(
    name = "wimm",
    version,
    about = "Where is my money: plain-text double-entry bookkeeping",
    long_about = "wimm keeps a company ledger in hand-editable YAML files: \
                  transactions, invoices and a starting balance. Balances are \
                  always recomputed from the transaction log."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new data directory
    Init {
        /// Own company name, used in invoice account names
        #[arg(long)]
        company_name: Option<String>,
    },

    /// Show data path and settings
    Info,

    /// Print reports
    #[command(subcommand)]
    Show(wimm::cli::ShowCommands),

    /// Add items to the ledger
    #[command(subcommand)]
    Add(wimm::cli::AddCommands),

    /// Import bank statements
    #[command(subcommand)]
    Import(wimm::cli::ImportCommands),

    /// Conversion utilities
    #[command(subcommand)]
    Convert(wimm::cli::ConvertCommands),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = WimmPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init { company_name }) => {
            println!("Initializing wimm at: {}", paths.base_dir().display());
            if let Some(name) = company_name {
                settings.company_name = name;
                settings.save(&paths)?;
            }
            initialize_storage(&paths, &settings)?;
            println!("Initialization complete!");
            println!("Company name: {}", settings.company_name);
        }
        Some(Commands::Info) => {
            println!("Data directory: {}", paths.base_dir().display());
            println!(
                "Initialized:    {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            print!("{}", to_yaml_string(&settings)?);
        }
        Some(Commands::Show(cmd)) => {
            let storage = open_storage(paths)?;
            handle_show_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Add(cmd)) => {
            let storage = open_storage(paths)?;
            handle_add_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import(cmd)) => {
            let storage = open_storage(paths)?;
            handle_import_command(&storage, cmd)?;
        }
        Some(Commands::Convert(cmd)) => {
            let storage = open_storage(paths)?;
            handle_convert_command(&storage, cmd)?;
        }
        None => {
            println!("wimm - plain-text double-entry bookkeeping");
            println!();
            println!("Run 'wimm --help' for usage information.");
        }
    }

    Ok(())
}

/// Load the ledger of an initialized data directory
fn open_storage(paths: WimmPaths) -> Result<Storage> {
    if !paths.is_initialized() {
        bail!(
            "No ledger found at {}. Run 'wimm init' first.",
            paths.base_dir().display()
        );
    }

    let mut storage = Storage::new(paths)?;
    storage.load_all()?;
    Ok(storage)
}
