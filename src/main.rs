use clap::Parser;
use extrator_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args) => cli::resolve::run(args).await,
        Command::Seed(args) => cli::seed::run(args).await,
        Command::Upload(args) => cli::upload::run(args).await,
    }
}
