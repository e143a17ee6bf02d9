//! Validate / wire commands

use std::path::Path;

use colored::Colorize;

use crate::errors::{Result, UrlynkError};
use crate::interfaces::cli::CliError;
use crate::models::LinkConfig;
use crate::validation::validate;
use crate::wire::to_wire_format;

/// 读取链接配置文件，按扩展名选择 TOML 或 JSON
pub fn load_link_config(file_path: &str) -> Result<LinkConfig> {
    let content = std::fs::read_to_string(file_path).map_err(|e| {
        UrlynkError::file_operation(format!("Failed to read {}: {}", file_path, e))
    })?;

    let is_toml = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

pub fn validate_link_file(file_path: &str) -> std::result::Result<(), CliError> {
    let config = load_link_config(file_path)?;
    validate(&config).map_err(|e| CliError::ValidationError(e.to_string()))?;

    println!(
        "{} Link configuration is valid: {} -> {}",
        "✓".bold().green(),
        file_path.cyan(),
        config.url.trim().blue().underline()
    );
    Ok(())
}

pub fn print_wire_format(file_path: &str, pretty: bool) -> std::result::Result<(), CliError> {
    let config = load_link_config(file_path)?;
    validate(&config).map_err(|e| CliError::ValidationError(e.to_string()))?;

    let envelope = to_wire_format(&config).into_envelope();
    let json = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    }
    .map_err(|e| CliError::ParseError(e.to_string()))?;

    println!("{}", json);
    Ok(())
}
