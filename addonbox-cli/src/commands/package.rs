//! Package rendering commands: manifest, archive, show and deps.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use addonbox::config::ConfigFile;
use addonbox::service::PackageService;
use addonbox::store::DirectoryStore;

use crate::error::CliError;

/// Package selection.
#[derive(Debug, Args)]
pub struct PackageArgs {
    /// Package identifier
    pub id: u32,

    /// Revision (defaults to the latest)
    #[arg(long)]
    pub rev: Option<u32>,
}

/// Package selection plus an output destination.
#[derive(Debug, Args)]
pub struct OutputArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Build the service over the configured data directory.
fn build_service(config: &ConfigFile) -> PackageService {
    let store = Arc::new(
        DirectoryStore::new(&config.storage.data_dir)
            .with_blob_format(config.storage.blob_format),
    );
    PackageService::new(config.service_config(), store.clone(), store)
}

/// Write bytes to a file or stdout.
fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, bytes)?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write the text manifest.
pub fn run_manifest(config: &ConfigFile, args: OutputArgs) -> Result<(), CliError> {
    let service = build_service(config);
    let bytes = service.manifest(args.package.id, args.package.rev)?;
    write_output(args.output.as_deref(), &bytes)
}

/// Write the binary archive. Ctrl-C aborts pending blob reads.
pub fn run_archive(config: &ConfigFile, args: OutputArgs) -> Result<(), CliError> {
    let service = build_service(config);

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }

    let bytes = service.archive(args.package.id, args.package.rev, Some(&cancel))?;
    if bytes.is_empty() {
        warn!(id = args.package.id, "Package has no whitelisted content, archive is empty");
    }
    write_output(args.output.as_deref(), &bytes)
}

/// Print the JSON view.
pub fn run_show(config: &ConfigFile, args: PackageArgs) -> Result<(), CliError> {
    let service = build_service(config);
    println!("{}", service.package_json(args.id, args.rev)?);
    Ok(())
}

/// Print the include closure, one snapshot per line.
pub fn run_deps(config: &ConfigFile, args: PackageArgs) -> Result<(), CliError> {
    let service = build_service(config);
    let deps = service.dependencies(args.id, args.rev)?;

    if deps.is_empty() {
        println!("No dependencies");
        return Ok(());
    }

    for package in &deps {
        println!("{}", package);
    }
    Ok(())
}
