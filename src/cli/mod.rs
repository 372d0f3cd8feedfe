//! CLI module for Extrator Gateway
//!
//! Provides subcommands for exercising the data-access layer:
//! - `resolve`: look up a dominio value through the cache
//! - `seed`: load dominio records into the configured storage
//! - `upload`: push a local file to the object store

pub mod resolve;
pub mod seed;
pub mod upload;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Extrator Gateway - cached dominio lookup and object store uploads
#[derive(Parser)]
#[command(name = "extrator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a dominio/valor pair through the cache
    Resolve(resolve::ResolveArgs),

    /// Load a JSON array of dominio records into storage
    Seed(seed::SeedArgs),

    /// Upload a local file to the object store
    Upload(upload::UploadArgs),
}

/// Loads `.env`, configuration and logging shared by every subcommand
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
