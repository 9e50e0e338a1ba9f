//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod add;
pub mod convert;
pub mod import;
pub mod show;

pub use add::{handle_add_command, AddCommands};
pub use convert::{handle_convert_command, ConvertCommands};
pub use import::{handle_import_command, ImportCommands};
pub use show::{handle_show_command, ShowCommands};
