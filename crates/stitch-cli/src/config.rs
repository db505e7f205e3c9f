//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--views`, `--no-color`; handled at the call-site)
//! 2. Environment variables (`STITCH_VIEWS__ROOT`, `STITCH_OUTPUT__NO_COLOR`, ...)
//! 3. Config file (`--config FILE`, or the platform default location)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CliResult, IntoCli};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where views live.
    pub views: ViewsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Views root; relative paths are taken from the working directory.
    pub root: PathBuf,
    /// Extension appended to view names given without one.
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            views: ViewsConfig {
                root: PathBuf::from("views"),
                extension: "html".into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then `STITCH_*`
    /// environment variables.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("STITCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stitch.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stitch", "stitch")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stitch.toml"))
    }

    /// Absolute views root: the `--views` override if given, else
    /// `views.root`, anchored at the working directory when relative.
    pub fn views_root(&self, cli_override: Option<&Path>) -> CliResult<PathBuf> {
        let root = cli_override.unwrap_or(&self.views.root);
        if root.is_absolute() {
            return Ok(root.to_path_buf());
        }
        let cwd = std::env::current_dir().with_cli_context(|| "reading working directory")?;
        Ok(cwd.join(root))
    }
}
