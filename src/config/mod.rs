mod file_config;

pub use file_config::{FileConfig, SongDetailsConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub pagination_limit: i32,
    pub details_url: Option<String>,
    pub details_timeout_sec: u64,
    pub read_pool_size: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    /// Page size of listings when the request gives no usable limit.
    pub pagination_limit: i32,
    pub read_pool_size: usize,
    /// Song details service. `None` disables enrichment.
    pub details_url: Option<String>,
    pub details_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let db_dir = match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !db_dir.is_dir() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let pagination_limit = file.pagination_limit.unwrap_or(cli.pagination_limit);
        if pagination_limit <= 0 {
            bail!("pagination_limit must be positive, got {}", pagination_limit);
        }

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let details_file = file.song_details.unwrap_or_default();
        let details_url = details_file
            .url
            .or_else(|| cli.details_url.clone())
            .filter(|url| !url.is_empty());
        let details_timeout_sec = details_file
            .timeout_sec
            .unwrap_or(cli.details_timeout_sec);
        if details_timeout_sec == 0 {
            bail!("Song details timeout must be at least 1 second");
        }

        Ok(Self {
            db_path,
            port,
            logging_level,
            pagination_limit,
            read_pool_size,
            details_url,
            details_timeout_sec,
        })
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
