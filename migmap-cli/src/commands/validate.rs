//! Validate command implementation.
//!
//! Parses a single configuration file and checks its values, without
//! merging any other layer.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use migmap::config::{ConfigLoader, ConfigValidator};
use std::path::PathBuf;

/// Validate a configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Path to the configuration file
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = ConfigLoader::load_file(&self.config_path)
            .map_err(|e| CliError::SemanticFailure(format!("Configuration is invalid: {e}")))?;

        ConfigValidator::validate(&config)
            .map_err(|e| CliError::SemanticFailure(format!("Configuration is invalid: {e}")))?;

        if !global.quiet {
            println!("Configuration is valid");
        }
        Ok(())
    }
}
