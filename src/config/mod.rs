//! Configuration module for wimm
//!
//! This module provides configuration management including:
//! - Data directory resolution (`WIMM_PATH`)
//! - User settings persistence (company name, tax rate, account templates)

pub mod paths;
pub mod settings;

pub use paths::WimmPaths;
pub use settings::{AccountTemplate, Settings, TemplateParams};
