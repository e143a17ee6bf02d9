//! Generate config command

use colored::Colorize;

use crate::config::ClientConfig;
use crate::interfaces::cli::CliError;

/// Generate example configuration file
pub fn config_generate(output: Option<String>) -> Result<(), CliError> {
    let Some(path) = output else {
        print!("{}", ClientConfig::generate_sample_config());
        return Ok(());
    };

    match ClientConfig::default().save_to_file(&path) {
        Ok(()) => {
            println!(
                "{} {} {}",
                "✓".bold().green(),
                "Configuration file generated:".green(),
                path.blue()
            );
            println!(
                "  {}",
                "Set api.api_key before running shorten / deep-link / resolve".yellow()
            );
            Ok(())
        }
        Err(e) => Err(CliError::CommandError(format!(
            "Unable to write configuration file: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urlynk.toml");
        config_generate(Some(path.to_string_lossy().into_owned())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("base_url"));
    }
}
