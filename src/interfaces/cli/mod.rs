//! CLI interface module
//!
//! This module provides command-line interface functionality for urlynk.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::ClientConfig;
use crate::errors::UrlynkError;
use commands::{
    config_generate, create_deep_link, print_wire_format, resolve_link, shorten_link,
    validate_link_file,
};

#[derive(Debug)]
pub enum CliError {
    /// 链接配置未通过校验
    ValidationError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ValidationError(msg) => format!("Validation error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ValidationError(msg) => {
                format!("{} {}", "Validation error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<UrlynkError> for CliError {
    fn from(err: UrlynkError) -> Self {
        match err {
            UrlynkError::Validation(msg) => CliError::ValidationError(msg),
            UrlynkError::Serialization(msg) => CliError::ParseError(msg),
            other => CliError::CommandError(other.format_simple()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &ClientConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Validate { file_path } => validate_link_file(&file_path),

        Commands::Wire { file_path, pretty } => print_wire_format(&file_path, pretty),

        Commands::Shorten { file_path } => shorten_link(config, &file_path).await,

        Commands::DeepLink { data } => create_deep_link(config, &data).await,

        Commands::Resolve { link } => resolve_link(config, &link).await,

        Commands::Config { action } => match action {
            ConfigCommands::Generate { output } => config_generate(output),
        },
    }
}
