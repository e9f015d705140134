use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_library_server::config::{AppConfig, CliConfig, FileConfig};
use song_library_server::{
    run_server, HttpSongDetailsClient, LibraryStore, NoOpSongDetailsProvider, RequestsLoggingLevel,
    SongDetailsProvider, SongLibrary, SqliteLibraryStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let resolved_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if resolved_path.is_absolute() {
        return Ok(resolved_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(resolved_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite library database file. Created if missing.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 7654)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Number of songs per listing page when the request sets no limit.
    #[clap(long, default_value_t = 10)]
    pub pagination_limit: i32,

    /// Base URL of the song details service. Without it songs are added
    /// without details.
    #[clap(long)]
    pub details_url: Option<String>,

    /// Timeout in seconds for song details requests.
    #[clap(long, default_value_t = 10)]
    pub details_timeout_sec: u64,

    /// Number of read-only database connections.
    #[clap(long, default_value_t = 4)]
    pub read_pool_size: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            pagination_limit: self.pagination_limit,
            details_url: self.details_url.clone(),
            details_timeout_sec: self.details_timeout_sec,
            read_pool_size: self.read_pool_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite library database at {:?}...", config.db_path);
    let store: Arc<dyn LibraryStore> = Arc::new(SqliteLibraryStore::new(
        &config.db_path,
        config.read_pool_size,
    )?);

    let details_provider: Arc<dyn SongDetailsProvider> = match &config.details_url {
        Some(url) => {
            info!(
                "Using song details service at {} (timeout {}s)",
                url, config.details_timeout_sec
            );
            Arc::new(HttpSongDetailsClient::new(url, config.details_timeout_sec)?)
        }
        None => {
            warn!("No song details service configured, songs will be added without details");
            Arc::new(NoOpSongDetailsProvider)
        }
    };

    let library = SongLibrary::new(store, details_provider, config.pagination_limit);

    info!("Ready to serve at port {}!", config.port);
    run_server(library, config.logging_level, config.port).await
}
