//! Command-line and file configuration
//!
//! Priority: command line / environment, then the TOML file, then built-in
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;

use crate::model::{ExportFormat, ExportOptions, FilterForm, Theme};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE: &str = "config.toml";

/// Command-line arguments for music-export
#[derive(Parser, Debug, Default)]
#[command(name = "music-export")]
#[command(about = "Terminal client for filtering a music library and exporting songs")]
#[command(version)]
pub struct Args {
    /// Base URL of the library backend
    #[arg(short, long, env = "MUSIC_EXPORT_SERVER")]
    pub server: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = "MUSIC_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where downloaded export archives are written
    #[arg(short, long, env = "MUSIC_EXPORT_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "MUSIC_EXPORT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// Initial values of the filter form and export panel
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub rating: Option<u8>,
    pub limit: Option<u32>,
    pub exclude_genres: Vec<String>,
    pub dyn_ps_val: Option<i64>,
    pub album_limit: Option<u32>,
    pub randomize: Option<bool>,
    pub export_format: Option<ExportFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub theme: Theme,
    pub defaults: FormDefaults,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

/// Fully resolved configuration
#[derive(Debug)]
pub struct AppConfig {
    pub server: String,
    pub download_dir: PathBuf,
    pub timeout: Duration,
    pub theme: Theme,
    pub filters: FilterForm,
    pub export_options: ExportOptions,
}

impl AppConfig {
    /// Load the TOML file (explicit path, or the per-user default when it
    /// exists) and merge it with the arguments.
    pub fn resolve(args: Args) -> Result<Self> {
        let toml_config = match &args.config {
            Some(path) => load_toml(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => load_toml(&path)?,
                None => TomlConfig::default(),
            },
        };
        Ok(Self::from_parts(args, toml_config))
    }

    pub fn from_parts(args: Args, toml_config: TomlConfig) -> Self {
        let TomlConfig {
            server,
            download_dir,
            timeout_secs,
            theme,
            defaults,
        } = toml_config;

        let server = args
            .server
            .or(server)
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let download_dir = args
            .download_dir
            .or(download_dir)
            .unwrap_or_else(default_download_dir);
        let timeout = Duration::from_secs(
            args.timeout_secs.or(timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        let mut filters = FilterForm::default();
        if let Some(rating) = defaults.rating {
            filters.rating = rating.min(100).to_string();
        }
        if let Some(limit) = defaults.limit {
            filters.limit = limit.to_string();
        }
        if !defaults.exclude_genres.is_empty() {
            filters.exclude_genres = defaults.exclude_genres.join(", ");
        }
        if let Some(value) = defaults.dyn_ps_val {
            filters.dyn_ps_val = value.to_string();
        }
        if let Some(value) = defaults.album_limit {
            filters.album_limit = value.to_string();
        }
        if let Some(randomize) = defaults.randomize {
            filters.randomize = randomize;
        }

        let export_options = ExportOptions::new(defaults.export_format.unwrap_or_default());

        Self {
            server,
            download_dir,
            timeout,
            theme,
            filters,
            export_options,
        }
    }
}

fn load_toml(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = TomlConfig::parse(&content)?;
    tracing::info!(path = %path.display(), "Loaded TOML configuration");
    Ok(config)
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "music-export").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn default_download_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
