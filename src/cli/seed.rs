//! Seed command - loads dominio records into the configured storage

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::domain::{Dominio, Storage};

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON file holding an array of dominio records
    pub file: PathBuf,
}

/// Reads a JSON array of dominio records
pub async fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Dominio>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid dominio records in '{}'", path.display()))
}

/// Upserts every record, returning how many were written
pub async fn seed_storage(
    storage: &dyn Storage<Dominio>,
    dominios: Vec<Dominio>,
) -> anyhow::Result<usize> {
    let total = dominios.len();

    for dominio in dominios {
        storage.save(dominio).await?;
    }

    Ok(total)
}

pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let dominios = load_seed_file(&args.file).await?;
    let storage = crate::create_dominio_storage(&config).await?;

    let written = seed_storage(storage.as_ref(), dominios).await?;
    info!(written, file = %args.file.display(), "Dominio records seeded");
    println!("Seeded {} dominio records", written);

    Ok(())
}
