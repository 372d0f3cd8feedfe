//! Upload command - pushes a local file to the object store

use std::path::{Path, PathBuf};

use clap::Args;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub path: PathBuf,

    /// Remote object name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

fn default_remote_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Cannot derive an object name from '{}'", path.display()))
}

pub async fn run(args: UploadArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let gateway = crate::create_upload_gateway(&config).await?;

    let remote_name = match args.name {
        Some(name) => name,
        None => default_remote_name(&args.path)?,
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling transfer");
            on_signal.cancel();
        }
    });

    let receipt = gateway
        .upload_with_cancellation(&args.path, &remote_name, cancel)
        .await?;

    println!(
        "Uploaded {} bytes to s3://{}/{} ({} parts)",
        receipt.bytes, receipt.bucket, receipt.key, receipt.parts
    );

    Ok(())
}
