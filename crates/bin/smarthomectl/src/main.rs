//! # smarthomectl: smart-home record manager
//!
//! Composition root that wires the CSV store into the registry and runs a
//! single command against it.
//!
//! ## Responsibilities
//! - Parse command-line arguments and configuration (file, env vars)
//! - Initialize logging
//! - Construct the CSV home store (adapter) and open the registry on it
//! - Run one command, then save the registry if the command changed it
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod cli;
mod commands;
mod config;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use smarthome_adapter_storage_csv::CsvHomeStore;
use smarthome_app::services::registry::Registry;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(path) = cli.storage {
        config.storage.path = path;
    }

    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    // Store and registry
    let store = CsvHomeStore::new(config.storage_path());
    let mut registry = Registry::open(store)
        .with_context(|| format!("loading homes from {}", config.storage_path().display()))?;

    // Command
    let mutates = cli.command.mutates();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&mut registry, cli.command, &mut out)?;
    out.flush()?;

    if mutates {
        registry
            .save()
            .with_context(|| format!("saving homes to {}", config.storage_path().display()))?;
    }

    Ok(())
}
