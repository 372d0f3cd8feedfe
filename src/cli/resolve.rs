//! Resolve command - looks up a dominio value through the cached repository

use std::path::PathBuf;

use clap::Args;

use crate::domain::DominioValor;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Dominio code
    #[arg(long)]
    pub dominio: i32,

    /// Valor code within the dominio
    #[arg(long)]
    pub valor: i32,

    /// Seed file loaded into storage before resolving (useful with in-memory storage)
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let storage = crate::create_dominio_storage(&config).await?;

    if let Some(path) = &args.seed {
        let dominios = super::seed::load_seed_file(path).await?;
        super::seed::seed_storage(storage.as_ref(), dominios).await?;
    }

    let repository = crate::create_dominio_repository_with_storage(&config, storage).await?;
    let query = DominioValor::new(args.dominio, args.valor);

    match repository.resolve(&query).await? {
        Some(dominio) => println!("{}", serde_json::to_string_pretty(&dominio)?),
        None => eprintln!(
            "No dominio {} with valor {} found",
            query.codigo_dominio, query.codigo_valor
        ),
    }

    Ok(())
}
