//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for urlynk using clap's derive macros.

use clap::{Parser, Subcommand};

/// URLynk - link validation, wire encoding and API client
#[derive(Parser)]
#[command(name = "urlynk")]
#[command(version)]
#[command(about = "Validate, encode and create URLynk links", long_about = None)]
pub struct Cli {
    /// Configuration file (default: urlynk.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a link configuration file (JSON or TOML)
    Validate {
        /// Link configuration file
        file_path: String,
    },

    /// Validate a link configuration and print its wire JSON
    Wire {
        /// Link configuration file
        file_path: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Create a short link through the API
    Shorten {
        /// Link configuration file
        file_path: String,
    },

    /// Create a deep link carrying the given data
    DeepLink {
        /// Data to encode in the link
        data: String,
    },

    /// Resolve an incoming deep link
    Resolve {
        /// Deep link, e.g. https://urlynk.in/<app>/<id>
        link: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: print to stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_pretty() {
        let cli = Cli::parse_from(["urlynk", "wire", "link.json", "--pretty"]);
        match cli.command {
            Commands::Wire { file_path, pretty } => {
                assert_eq!(file_path, "link.json");
                assert!(pretty);
            }
            _ => panic!("expected wire command"),
        }
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::parse_from(["urlynk", "resolve", "https://urlynk.in/a/b", "-c", "x.toml"]);
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert!(matches!(cli.command, Commands::Resolve { .. }));
    }

    #[test]
    fn test_parse_config_generate() {
        let cli = Cli::parse_from(["urlynk", "config", "generate", "-o", "out.toml"]);
        match cli.command {
            Commands::Config {
                action: ConfigCommands::Generate { output },
            } => assert_eq!(output.as_deref(), Some("out.toml")),
            _ => panic!("expected config generate"),
        }
    }

    #[test]
    fn test_deep_link_subcommand_name() {
        let cli = Cli::parse_from(["urlynk", "deep-link", "promo=42"]);
        assert!(matches!(cli.command, Commands::DeepLink { data } if data == "promo=42"));
    }
}
