//! dao-console entry point
//!
//! Drives the asset library and overview panels against a fixture backend
//! and renders the results as terminal tables.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::info;

use dao_console::assets::{AssetLibrary, UploadOutcome};
use dao_console::config::ConsoleConfig;
use dao_console::format::{format_bytes, Percent};
use dao_console::model::{AssetId, UploadFile};
use dao_console::overview::{OverviewPanel, OverviewSources};
use dao_console::sources::fixture::FixtureBackend;
use dao_console::telemetry;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DAO_CONSOLE_GIT_SHA"),
    " ",
    env!("DAO_CONSOLE_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(author, version = VERSION, about = "DAO management console")]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "DAO_CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON fixture document serving as the backend
    #[arg(long, env = "DAO_CONSOLE_FIXTURE")]
    fixture: PathBuf,

    /// Principal to act as; overrides the fixture's caller
    #[arg(long, env = "DAO_CONSOLE_CALLER")]
    caller: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the reconciled asset library and storage usage
    Assets,
    /// Show dashboard figures and recent activity
    Overview,
    /// Upload a file to the library
    Upload { path: PathBuf },
    /// Write an asset's payload into a directory
    Download { id: AssetId, dir: PathBuf },
    /// Delete an asset
    Delete { id: AssetId },
    /// Load both panels once and print the resulting metrics in
    /// Prometheus text format
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs).context("Failed to initialize tracing")?;
    info!("Starting dao-console v{}", VERSION);

    let result = run(cli).await;

    telemetry::shutdown_telemetry();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConsoleConfig::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    let backend = Arc::new(load_fixture(&cli.fixture, cli.caller).await?);

    match cli.command {
        Command::Assets => {
            let library = AssetLibrary::new(backend, &config);
            library.load().await?;
            let snapshot = library.snapshot();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_assets(&snapshot);
            }
        }
        Command::Overview => {
            let profile = backend.profile().await;
            let caller = backend.caller().await;
            let panel = OverviewPanel::new(profile, OverviewSources::shared(backend), caller, &config);
            // A failed load still renders, using fallback figures.
            if let Err(e) = panel.load().await {
                eprintln!("warning: {e}");
            }
            let snapshot = panel.snapshot();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_overview(&snapshot);
            }
        }
        Command::Upload { path } => {
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let library = AssetLibrary::new(backend, &config);
            match upload_with_progress(&library, file).await? {
                UploadOutcome::Uploaded(asset) => {
                    println!("Uploaded {} as asset {} ({})", asset.name, asset.id, format_bytes(asset.size));
                }
                UploadOutcome::NoFile | UploadOutcome::Busy => bail!("Upload was not started"),
            }
        }
        Command::Download { id, dir } => {
            let library = AssetLibrary::new(backend, &config);
            let downloaded = library.download_to(id, &dir).await?;
            println!(
                "Wrote {} ({}) sha256:{}",
                downloaded.path.display(),
                format_bytes(downloaded.bytes),
                downloaded.sha256
            );
        }
        Command::Delete { id } => {
            let library = AssetLibrary::new(backend, &config);
            library.delete(id).await?;
            println!("Deleted asset {id}; {} assets remain", library.snapshot().assets.len());
        }
        Command::Metrics => {
            let library = AssetLibrary::new(backend.clone(), &config);
            let profile = backend.profile().await;
            let caller = backend.caller().await;
            let panel = OverviewPanel::new(profile, OverviewSources::shared(backend), caller, &config);
            // Failures are counted, not fatal.
            let _ = tokio::join!(library.load(), panel.load());
            print_metrics()?;
        }
    }
    Ok(())
}

async fn load_fixture(path: &Path, caller: Option<String>) -> Result<FixtureBackend> {
    let backend = FixtureBackend::from_path(path)
        .await
        .with_context(|| format!("Failed to load fixture {}", path.display()))?;
    Ok(backend.with_caller(caller))
}

/// Run the upload while echoing the simulated progress to stderr.
async fn upload_with_progress(library: &AssetLibrary, file: UploadFile) -> Result<UploadOutcome> {
    let upload = library.upload(Some(file));
    tokio::pin!(upload);

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut shown = None;
    let outcome = loop {
        tokio::select! {
            outcome = &mut upload => break outcome,
            _ = ticker.tick() => {
                let state = library.snapshot().upload;
                if state.busy() && shown != Some(state.progress) {
                    eprint!("\rUploading... {}", Percent::new(u32::from(state.progress)));
                    shown = Some(state.progress);
                }
            }
        }
    };
    if shown.is_some() {
        eprintln!();
    }
    Ok(outcome?)
}

fn print_assets(snapshot: &dao_console::assets::AssetLibrarySnapshot) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Type", "Size", "Visibility", "Tags"]);
    for asset in &snapshot.assets {
        let tags: Vec<&str> = asset.tags.iter().map(String::as_str).collect();
        table.add_row(vec![
            asset.id.to_string(),
            asset.name.clone(),
            asset.content_type.clone(),
            format_bytes(asset.size),
            asset.visibility().to_string(),
            tags.join(", "),
        ]);
    }
    println!("{table}");

    if let (Some(storage), Some(utilization)) = (&snapshot.storage, snapshot.utilization) {
        println!(
            "Storage: {} of {} used ({}), {} assets, average {}",
            format_bytes(storage.storage_used),
            format_bytes(storage.storage_limit),
            utilization,
            storage.total_assets,
            format_bytes(storage.average_file_size)
        );
    }
}

fn print_overview(snapshot: &dao_console::overview::OverviewSnapshot) {
    println!("{} ({})", snapshot.profile.name, snapshot.profile.category);

    let mut stats = Table::new();
    stats.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value", "Change"]);
    for stat in &snapshot.metrics.quick_stats {
        stats.add_row(vec![
            stat.label.to_string(),
            stat.value.clone(),
            stat.change.clone().unwrap_or_default(),
        ]);
    }
    let performance = &snapshot.metrics.performance;
    stats.add_row(vec![
        "Governance Participation".to_string(),
        performance.governance_participation.to_string(),
        String::new(),
    ]);
    stats.add_row(vec![
        "Treasury Utilization".to_string(),
        performance.treasury_utilization.to_string(),
        String::new(),
    ]);
    println!("{stats}");

    if let Some(mine) = &snapshot.metrics.caller_staking {
        println!(
            "Your staking: {} staked, {} rewards, {} active stakes",
            mine.staked, mine.rewards, mine.active_stakes
        );
    }

    if !snapshot.activity.is_empty() {
        let mut activity = Table::new();
        activity
            .load_preset(UTF8_FULL)
            .set_header(vec!["When", "Type", "Title", "Status"]);
        for record in &snapshot.activity {
            activity.add_row(vec![
                record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                record.activity_type.to_string(),
                record.title.clone(),
                record.status.clone(),
            ]);
        }
        println!("{activity}");
    }
}

#[cfg(feature = "metrics")]
fn print_metrics() -> Result<()> {
    let text = dao_console::metrics::encode().context("Failed to encode metrics")?;
    print!("{text}");
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn print_metrics() -> Result<()> {
    bail!("dao-console was built without the `metrics` feature")
}
