//! Configuration CLI commands.
//!
//! Provides `config list` and `config path` for viewing the effective
//! settings.

use std::path::Path;

use clap::Subcommand;

use addonbox::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, path: &Path, config: &ConfigFile) -> Result<(), CliError> {
    match command {
        ConfigCommands::List => {
            print!("{}", render_list(config));
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn render_list(config: &ConfigFile) -> String {
    let value = |v: &str| {
        if v.is_empty() {
            "(not set)".to_string()
        } else {
            v.to_string()
        }
    };

    let directory = config
        .logging
        .directory
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("Configuration Settings\n");
    out.push_str("======================\n\n");
    out.push_str("[content]\n");
    out.push_str(&format!("  url_base = {}\n\n", value(&config.content.url_base)));
    out.push_str("[storage]\n");
    out.push_str(&format!(
        "  data_dir = {}\n",
        value(&config.storage.data_dir.display().to_string())
    ));
    out.push_str(&format!(
        "  blob_format = {}\n\n",
        config.storage.blob_format
    ));
    out.push_str("[logging]\n");
    out.push_str(&format!("  level = {}\n", value(&config.logging.level)));
    out.push_str(&format!("  directory = {}\n", value(&directory)));
    out
}
