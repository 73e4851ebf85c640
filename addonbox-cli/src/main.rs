//! Addonbox CLI - Command-line interface
//!
//! Renders stored package snapshots into legacy manifests and archives,
//! checks paths against the content whitelist and inspects archive files.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;

use addonbox::config::{config_file_path, ConfigFile};
use addonbox::logging::init_logging;

use commands::config::ConfigCommands;
use commands::package::{OutputArgs, PackageArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "addonbox", version, about = "Legacy addon packaging tools")]
struct Cli {
    /// Path to config.ini (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the text manifest for a package
    Manifest(OutputArgs),

    /// Write the binary archive for a package
    Archive(OutputArgs),

    /// Print the JSON view of a package
    Show(PackageArgs),

    /// Print the transitive includes of a package
    Deps(PackageArgs),

    /// Check paths against the content whitelist
    Whitelist {
        /// Content paths to check
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Decode an archive file and print its header and file table
    Inspect {
        /// Archive file
        file: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);
    let config = ConfigFile::load_from(&config_path)?;

    let _guard = init_logging(&config.logging_config().verbose(cli.verbose))?;
    debug!(path = %config_path.display(), "Loaded configuration");

    match cli.command {
        Commands::Manifest(args) => commands::package::run_manifest(&config, args),
        Commands::Archive(args) => commands::package::run_archive(&config, args),
        Commands::Show(args) => commands::package::run_show(&config, args),
        Commands::Deps(args) => commands::package::run_deps(&config, args),
        Commands::Whitelist { paths } => commands::whitelist::run(&paths),
        Commands::Inspect { file } => commands::inspect::run(&file),
        Commands::Config { command } => commands::config::run(command, &config_path, &config),
    }
}
