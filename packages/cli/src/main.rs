mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use common::storage::filesystem::FilesystemDocumentStore;
use media::{AssetKind, AssetService};
use tracing::{Level, info, warn};

#[derive(Parser)]
#[command(
    name = "gym-media",
    version,
    about = "Store and retrieve chunked video and image assets"
)]
struct Cli {
    /// Config file, without or with extension.
    #[arg(long, global = true, env = "GYM_MEDIA_CONFIG")]
    config: Option<String>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file as the asset of a record, replacing any previous one.
    Put {
        id: String,
        file: PathBuf,
        /// Asset kind; guessed from the file extension when omitted.
        #[arg(long)]
        kind: Option<AssetKind>,
    },
    /// Reassemble a record's asset and write it to a file.
    Get { id: String, out: PathBuf },
    /// Delete a record and all of its fragments.
    Rm { id: String },
    /// Show how a record stores its asset.
    Inspect { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();

    let config = config::CliAppConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    let store = FilesystemDocumentStore::new(
        config.storage.root.clone(),
        config.storage.max_record_size,
    )
    .await
    .with_context(|| format!("Failed to open store at {}", config.storage.root.display()))?;
    let service = AssetService::new(config.chunking).context("Invalid chunking config")?;

    match cli.command {
        Command::Put { id, file, kind } => {
            let kind = match kind {
                Some(kind) => kind,
                None => AssetKind::from_path(&file)?,
            };
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let receipt = service.upload_bytes(&store, &id, kind, &bytes).await?;
            if receipt.truncated_chars > 0 {
                warn!(
                    truncated_chars = receipt.truncated_chars,
                    "Asset was truncated; the stored copy is incomplete"
                );
            }
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::Get { id, out } => {
            let bytes = service.read_bytes(&store, &id).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(bytes = bytes.len(), out = %out.display(), "Asset written");
        }
        Command::Rm { id } => {
            if !service.remove(&store, &id).await? {
                warn!(%id, "No such record");
            }
        }
        Command::Inspect { id } => {
            let summary = service.inspect(&store, &id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
