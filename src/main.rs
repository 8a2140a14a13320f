// ReelPipe - desktop entry point
// Runs the scan/probe/grant pieces of the player against the local filesystem

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelpipe::{
    config::Config,
    find_covering_grant,
    logging::init_logging,
    media::{default_probe, ContainerProbe},
    storage::{LocalTree, PermissionStore},
    FolderScanner, Location,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "reelpipe")]
#[command(about = "Folder-scan video playlists with bit-perfect USB audio")]
struct Args {
    /// Debug-level logging regardless of config
    #[arg(long, global = true)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the playable videos of a folder in playlist order
    Scan {
        /// Folder path or location URI
        folder: String,
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the audio format bit-perfect negotiation would see for a file
    Probe { file: String },
    /// Check whether a configured folder grant covers a file
    Access { file: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config - falls back to defaults if missing
    let mut config = Config::load()?;
    if args.dev {
        config.logging.level = "debug".to_string();
    }
    let _log_guard = init_logging(&config.logging)?;
    debug!("Loaded config: {:?}", config);

    match args.command {
        Command::Scan { folder, json } => scan(&config, &folder, json).await,
        Command::Probe { file } => probe(&file),
        Command::Access { file } => access(&config, &file),
    }
}

async fn scan(config: &Config, folder: &str, json: bool) -> Result<()> {
    let folder = parse_location(folder)?;
    let scanner = FolderScanner::new(Arc::new(LocalTree::new())).with_extensions(&config.library.extensions);

    info!("Scanning {}", folder);
    let records = scanner.spawn_scan(folder).await.context("scan task failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No videos found");
        return Ok(());
    }
    for (i, record) in records.iter().enumerate() {
        let modified = record
            .modified_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {}  ({:.1} MB, {})",
            i + 1,
            record.display_name,
            record.size_bytes as f64 / (1024.0 * 1024.0),
            modified
        );
    }
    Ok(())
}

fn probe(file: &str) -> Result<()> {
    let file = parse_location(file)?;
    match default_probe().probe_audio_format(&file)? {
        Some(format) => println!("{}: {}", file, format),
        None => println!("{}: no audio stream", file),
    }
    Ok(())
}

fn access(config: &Config, file: &str) -> Result<()> {
    let file = parse_location(file)?;
    let grants = config.permission_store().list_grants();
    match find_covering_grant(&grants, &file) {
        Some(grant) => println!("Covered by {}", grant.tree_location),
        None => println!("No configured grant covers {}", file),
    }
    Ok(())
}

/// URIs pass through; anything else is a filesystem path
fn parse_location(input: &str) -> Result<Location> {
    if input.contains("://") {
        return Ok(Location::parse(input)?);
    }
    let path = Path::new(input)
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", input))?;
    Ok(Location::from_path(path)?)
}
