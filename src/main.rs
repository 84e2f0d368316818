use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use davsync::{SyncConfig, SyncStorage, WebDAVClient};

/// Key passed to the backend; it only labels log lines
const BACKUP_KEY: &str = "backup";

#[derive(Parser, Debug)]
#[command(name = "davsync", version, about = "Back up and restore sync data on a WebDAV server")]
struct Cli {
    /// JSON sync configuration; falls back to WEBDAV_* / SYNC_* environment variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is reachable with the configured credentials
    Check,
    /// Download the backup blob
    Pull {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a backup blob, replacing the remote copy
    Push {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => SyncConfig::from_json_file(path)?,
        None => SyncConfig::from_env()?,
    };
    config.validate()?;

    let client = WebDAVClient::new(&config)?;
    info!("Using {:?}", client);

    match cli.command {
        Command::Check => Ok(client.check().await),
        Command::Pull { output } => {
            let contents = client.get(BACKUP_KEY).await?;
            if contents.is_empty() {
                info!("No backup stored at {}", client.file_path());
            }
            match output {
                Some(path) => std::fs::write(&path, contents)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => std::io::stdout()
                    .write_all(contents.as_bytes())
                    .context("Failed to write backup to stdout")?,
            }
            Ok(true)
        }
        Command::Push { input } => {
            let contents = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read backup from stdin")?;
                    buf
                }
            };
            client.set(BACKUP_KEY, &contents).await?;
            info!("Uploaded {} bytes to {}", contents.len(), client.file_path());
            Ok(true)
        }
    }
}
