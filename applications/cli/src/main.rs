/// Melodify - command-line music player
use clap::{Parser, Subcommand};
use melodify_catalog::{CatalogClient, CatalogError};
use melodify_cli::{play_queue, print_tracks, AppConfig, PlayOptions, SimulatedDevice};
use melodify_playback::Track;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melodify")]
#[command(about = "Search, browse and play tracks from the Melodify catalog", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./melodify.toml)
    #[arg(short, long, global = true, env = "MELODIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current top tracks
    Chart,
    /// Search tracks by free text
    Search {
        /// Search query
        query: String,
    },
    /// Play search results (or the chart) on the simulated device
    Play {
        /// Search query; plays the chart when omitted
        #[arg(short, long)]
        query: Option<String>,
        /// Index of the first track to play
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Enable smart shuffle
        #[arg(long)]
        shuffle: bool,
        /// Skip to the next track every SECS seconds
        #[arg(long, value_name = "SECS")]
        skip_after: Option<u64>,
        /// Stop after this many tracks
        #[arg(long)]
        tracks: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melodify=info,melodify_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let catalog = CatalogClient::new(config.catalog_config())?;

    match cli.command {
        Commands::Chart => {
            let tracks = fetch(catalog.top_tracks().await)?;
            print_tracks(&mut std::io::stdout(), &tracks)?;
        }
        Commands::Search { query } => {
            let tracks = fetch(catalog.search_tracks(&query).await)?;
            print_tracks(&mut std::io::stdout(), &tracks)?;
        }
        Commands::Play {
            query,
            start,
            shuffle,
            skip_after,
            tracks,
        } => {
            let queue = fetch(catalog.search_tracks(query.as_deref().unwrap_or("")).await)?;

            let mut playback = config.playback_config();
            playback.shuffle |= shuffle;

            let device = Arc::new(SimulatedDevice::new(
                config.device.track_secs,
                Duration::from_millis(config.device.load_latency_ms),
            ));
            let options = PlayOptions {
                start_index: start,
                skip_after: skip_after.map(Duration::from_secs),
                max_tracks: tracks,
            };

            let interrupt = async {
                // No signal handler means no Ctrl-C; play until the track limit
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };

            let played = play_queue(
                queue,
                playback,
                device,
                options,
                &mut std::io::stdout(),
                interrupt,
            )
            .await?;
            tracing::info!(played, "Playback finished");
        }
    }

    Ok(())
}

/// Turn a catalog failure into the listener-facing message
fn fetch(result: Result<Vec<Track>, CatalogError>) -> anyhow::Result<Vec<Track>> {
    result.map_err(|e| {
        tracing::warn!(error = %e, "Catalog request failed");
        anyhow::anyhow!(e.user_message())
    })
}
